/// Fixed categorical colour palette, assigned to categories in order.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    colors: &'static [&'static str],
}

const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

impl ColorPalette {
    pub fn category10() -> Self {
        Self { colors: &CATEGORY10 }
    }

    /// Colour for the `index`-th category, cycling when categories outnumber colours.
    pub fn color(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }
}
