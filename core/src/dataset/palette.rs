/// Fixed, ordered list of fill colors assigned to items by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [&'static str],
}

const STOCK_COLORS: &[&str] = &["#6FCF97", "#2F80ED", "#F2994A", "#9B51E0"];
const EXPIRY_COLORS: &[&str] = &["#6FCF97", "#EB5757", "#F2C94C", "#9B51E0"];
const LOW_STOCK_COLORS: &[&str] = &["#EB5757", "#F2994A", "#F2C94C", "#278C67"];
const DEFAULT_COLORS: &[&str] = &["#00968A", "#F2A384", "#39D2C0", "#278C67"];

impl Palette {
    pub const STOCK: Palette = Palette {
        colors: STOCK_COLORS,
    };
    pub const EXPIRY: Palette = Palette {
        colors: EXPIRY_COLORS,
    };
    pub const LOW_STOCK: Palette = Palette {
        colors: LOW_STOCK_COLORS,
    };
    pub const DEFAULT: Palette = Palette {
        colors: DEFAULT_COLORS,
    };

    /// Palette for a dataset kind; unknown names fall back to [`Palette::DEFAULT`].
    pub fn for_dataset(name: &str) -> Palette {
        match name {
            "Estoque" | "Categorias" => Palette::STOCK,
            "Vencimento" | "Validades" => Palette::EXPIRY,
            "MenorEstoque" => Palette::LOW_STOCK,
            _ => Palette::DEFAULT,
        }
    }

    pub fn color_at(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_by_position() {
        let palette = Palette::EXPIRY;
        assert_eq!(palette.color_at(0), "#6FCF97");
        assert_eq!(palette.color_at(palette.len()), "#6FCF97");
        assert_eq!(palette.color_at(palette.len() + 1), "#EB5757");
    }

    #[test]
    fn unknown_dataset_uses_default_palette() {
        assert_eq!(Palette::for_dataset("Relatorios"), Palette::DEFAULT);
        assert_eq!(Palette::for_dataset("MenorEstoque"), Palette::LOW_STOCK);
    }
}
