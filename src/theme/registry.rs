use indexmap::IndexMap;

use crate::error::ChartResult;
use crate::render::Color;

use super::Style;

pub const BASELINE_STYLE: &str = "default";

const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];
const SEABORN_DEEP: [u32; 10] = [
    0x4c72b0, 0xdd8452, 0x55a868, 0xc44e52, 0x8172b3, 0x937860, 0xda8bc3, 0x8c8c8c, 0xccb974,
    0x64b5cd,
];

fn palette(packed: &[u32]) -> Vec<Color> {
    packed.iter().copied().map(Color::hex).collect()
}

/// Namespace of named styles.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRegistry {
    label: &'static str,
    styles: IndexMap<String, Style>,
}

impl StyleRegistry {
    #[must_use]
    pub fn empty(label: &'static str) -> Self {
        Self {
            label,
            styles: IndexMap::new(),
        }
    }

    /// General-purpose plotting styles. Contains the baseline style.
    #[must_use]
    pub fn general() -> Self {
        let white = Color::hex(0xffffff);
        let black = Color::hex(0x000000);
        let mut registry = Self::empty("general");
        for style in [
            Style::new(BASELINE_STYLE, white, black).with_palette(palette(&TAB10)),
            Style::new("classic", white, black).with_palette(palette(&[
                0x0000ff, 0x008000, 0xff0000, 0x00bfbf, 0xbf00bf, 0xbfbf00, 0x000000,
            ])),
            Style::new("ggplot", Color::hex(0xe5e5e5), Color::hex(0x555555))
                .with_grid(white)
                .with_palette(palette(&[
                    0xe24a33, 0x348abd, 0x988ed5, 0x777777, 0xfbc15e, 0x8eba42, 0xffb5b8,
                ])),
            Style::new("bmh", Color::hex(0xeeeeee), Color::hex(0x262626))
                .with_grid(Color::hex(0xb2b2b2))
                .with_palette(palette(&[
                    0x348abd, 0xa60628, 0x7a68a6, 0x467821, 0xd55e00, 0xcc79a7, 0x56b4e9, 0x009e73,
                ])),
            Style::new("dark_background", black, white).with_palette(palette(&[
                0x8dd3c7, 0xfeffb3, 0xbfbbd9, 0xfa8174, 0x81b1d2, 0xfdb462, 0xb3de69, 0xbc82bd,
            ])),
            Style::new("fivethirtyeight", Color::hex(0xf0f0f0), Color::hex(0x3c3c3c))
                .with_grid(Color::hex(0xcbcbcb))
                .with_font_size_px(14.0)
                .with_palette(palette(&[
                    0x008fd5, 0xfc4f30, 0xe5ae38, 0x6d904f, 0x8b8b8b, 0x810f7c,
                ])),
            Style::new("grayscale", white, black)
                .with_palette(palette(&[0x000000, 0x666666, 0x999999, 0xcccccc])),
        ] {
            registry.styles.insert(style.name.clone(), style);
        }
        registry
    }

    /// Statistical plotting styles.
    #[must_use]
    pub fn statistical() -> Self {
        let white = Color::hex(0xffffff);
        let panel = Color::hex(0xeaeaf2);
        let ink = Color::hex(0x262626);
        let mut registry = Self::empty("statistical");
        for style in [
            Style::new("darkgrid", panel, ink).with_grid(white),
            Style::new("whitegrid", white, ink).with_grid(Color::hex(0xcccccc)),
            Style::new("dark", panel, ink),
            Style::new("white", white, ink),
            Style::new("ticks", white, ink),
        ] {
            let style = style.with_palette(palette(&SEABORN_DEEP));
            registry.styles.insert(style.name.clone(), style);
        }
        registry
    }

    /// Adds or replaces a style after validating it.
    pub fn register(&mut self, style: Style) -> ChartResult<()> {
        style.validate()?;
        self.styles.insert(style.name.clone(), style);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_styles_are_valid() {
        for registry in [StyleRegistry::general(), StyleRegistry::statistical()] {
            for name in registry.names() {
                let style = registry.get(name).expect("listed style");
                style.validate().expect("builtin style validates");
            }
        }
    }

    #[test]
    fn registries_do_not_share_names() {
        let general = StyleRegistry::general();
        let statistical = StyleRegistry::statistical();
        assert!(general.contains(BASELINE_STYLE));
        assert!(statistical.names().all(|name| !general.contains(name)));
    }
}
