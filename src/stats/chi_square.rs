// Pearson chi-square test of independence on a 2x2 contingency table
//
// Rows are the two variants, columns are recommend / not recommend.

use super::distributions::chi_square_sf;
use super::StatsError;
use serde::Serialize;

/// Observed counts: `counts[row][col]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    pub counts: [[u64; 2]; 2],
}

impl ContingencyTable {
    pub fn new(counts: [[u64; 2]; 2]) -> Self {
        Self { counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn row_total(&self, row: usize) -> u64 {
        self.counts[row].iter().sum()
    }

    pub fn col_total(&self, col: usize) -> u64 {
        self.counts[0][col] + self.counts[1][col]
    }

    /// Expected count for a cell under independence
    pub fn expected(&self, row: usize, col: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let e = self.row_total(row) as f64 * self.col_total(col) as f64 / self.total() as f64;
        e
    }
}

/// Result of a chi-square test of independence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareTest {
    /// Chi-square statistic (always >= 0)
    pub statistic: f64,

    /// Degrees of freedom, 1 for a 2x2 table
    pub df: u32,

    pub p_value: f64,

    /// Whether Yates' continuity correction was applied
    pub yates_corrected: bool,
}

/// Chi-square test of independence on a 2x2 table
///
/// Every row and column total must be positive, otherwise some expected
/// count is zero and the statistic is undefined.
pub fn chi_square_2x2(table: &ContingencyTable, yates: bool) -> Result<ChiSquareTest, StatsError> {
    for i in 0..2 {
        if table.row_total(i) == 0 || table.col_total(i) == 0 {
            return Err(StatsError::DegenerateContingency);
        }
    }

    let mut statistic = 0.0;
    for row in 0..2 {
        for col in 0..2 {
            let expected = table.expected(row, col);
            #[allow(clippy::cast_precision_loss)]
            let observed = table.counts[row][col] as f64;
            let mut deviation = (observed - expected).abs();
            if yates {
                deviation = (deviation - 0.5).max(0.0);
            }
            statistic += deviation * deviation / expected;
        }
    }

    Ok(ChiSquareTest {
        statistic,
        df: 1,
        p_value: chi_square_sf(statistic, 1.0),
        yates_corrected: yates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi_square_reference() {
        let table = ContingencyTable::new([[36, 4], [27, 13]]);
        let result = chi_square_2x2(&table, false).unwrap();

        assert!((result.statistic - 6.050_420_168_067_23).abs() < 1e-9);
        assert!((result.p_value - 0.013_902_988_164_384_3).abs() < 1e-9);
        assert_eq!(result.df, 1);
        assert!(!result.yates_corrected);
    }

    #[test]
    fn test_chi_square_yates_reference() {
        let table = ContingencyTable::new([[36, 4], [27, 13]]);
        let result = chi_square_2x2(&table, true).unwrap();

        assert!((result.statistic - 4.780_578_898_225_96).abs() < 1e-9);
        assert!((result.p_value - 0.028_782_443_299_927_5).abs() < 1e-9);
    }

    #[test]
    fn test_chi_square_matches_shortcut_formula() {
        // For 2x2: N (ad - bc)^2 / (r1 r2 c1 c2)
        let table = ContingencyTable::new([[12, 8], [5, 15]]);
        let result = chi_square_2x2(&table, false).unwrap();

        let (a, b, c, d) = (12.0, 8.0, 5.0, 15.0);
        let n = a + b + c + d;
        let shortcut =
            n * (a * d - b * c) * (a * d - b * c) / ((a + b) * (c + d) * (a + c) * (b + d));
        assert!((result.statistic - shortcut).abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_independent_table_is_zero() {
        let table = ContingencyTable::new([[10, 10], [10, 10]]);
        let result = chi_square_2x2(&table, false).unwrap();

        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_chi_square_degenerate_column() {
        // Everybody recommends: "not recommend" column is empty
        let table = ContingencyTable::new([[40, 0], [40, 0]]);
        assert_eq!(
            chi_square_2x2(&table, false),
            Err(StatsError::DegenerateContingency)
        );
    }
}
