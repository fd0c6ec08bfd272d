use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    PlotBackground,
    Border,

    AxisLine,
    TickMark,
    TickLabel,
    AxisLabel,

    /// Chart title.
    TextPrimary,

    // Per-cell trajectory colors
    Series0,
    Series1,
    Series2,
    Series3,
    Series4,
    Series5,
    Series6,
    Series7,
    Series8,
    Series9,
}

const SERIES_PALETTE: [ThemeToken; 10] = [
    ThemeToken::Series0,
    ThemeToken::Series1,
    ThemeToken::Series2,
    ThemeToken::Series3,
    ThemeToken::Series4,
    ThemeToken::Series5,
    ThemeToken::Series6,
    ThemeToken::Series7,
    ThemeToken::Series8,
    ThemeToken::Series9,
];

impl ThemeToken {
    /// Trajectory color for the `index`-th cell, cycling through the palette.
    pub fn series_palette(index: usize) -> ThemeToken {
        SERIES_PALETTE[index % SERIES_PALETTE.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(ThemeToken::series_palette(0), ThemeToken::Series0);
        assert_eq!(ThemeToken::series_palette(9), ThemeToken::Series9);
        assert_eq!(ThemeToken::series_palette(10), ThemeToken::Series0);
    }
}
