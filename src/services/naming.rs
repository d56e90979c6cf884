// src/services/naming.rs

//! Seed-export product names and generated descriptions.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::text::capitalize;

const PRODUCT_TYPES: &[&str] = &[
    "Áo Thun", "Áo Sơ Mi", "Áo Khoác", "Áo Hoodie", "Áo Polo", "Áo Len", "Quần Jean",
    "Quần Kaki", "Quần Short",
];

const FIT_STYLES: &[&str] = &[
    "Relaxed Fit", "Slim Fit", "Regular Fit", "Oversized", "Crop Top", "Dài Tay", "Ngắn Tay",
    "Ba Lỗ", "Bomber", "Denim", "Cardigan", "Zip-up",
];

const DEFAULT_TYPE: &str = "Áo Thun";
const DEFAULT_DESIGN: &str = "Classic";

/// Material phrases in Vietnamese, one picked per description.
const MATERIALS: &[&str] = &[
    "cotton 100% mềm mại, thoáng mát, thấm hút mồ hôi tốt",
    "cotton cao cấp mềm mịn, co giãn nhẹ thoải mái",
    "cotton pha spandex thoáng khí, giữ form tốt",
    "vải cotton premium mát mẻ, không xù lông",
];

const STYLES: &[&str] = &[
    "phong cách casual hàng ngày, đi chơi cuối tuần, đi cafe với bạn bè",
    "phong cách streetwear năng động, đi học, đi làm",
    "phong cách minimalist hiện đại, dễ phối đồ",
    "phong cách trẻ trung, năng động, phù hợp mọi dịp",
];

/// Material boilerplate stripped from design names.
static MATERIAL_NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)cotton\s+cao\s+cấp",
        r"(?i)cotton\s+100%?",
        r"(?i)chất\s+liệu\S*",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static DESIGN_SUFFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"-\s*(.+)$").ok());

/// Rewrites storefront titles as `[Type] [Fit] - [Design]`.
pub struct ProductNameFormatter;

impl ProductNameFormatter {
    /// `"Áo Thun Relaxed Fit Summer Vibes"` → `"Áo Thun Relaxed Fit - Summer Vibes"`.
    pub fn format(original: &str) -> String {
        let product_type = Self::product_type(original);
        let fit = Self::fit_style(original);
        let design = Self::design_name(original, product_type, fit);

        match fit {
            Some(fit) => format!("{product_type} {fit} - {design}"),
            None => format!("{product_type} - {design}"),
        }
    }

    fn product_type(name: &str) -> &'static str {
        let upper = name.to_uppercase();
        PRODUCT_TYPES
            .iter()
            .copied()
            .find(|t| upper.contains(&t.to_uppercase()))
            .unwrap_or(DEFAULT_TYPE)
    }

    fn fit_style(name: &str) -> Option<&'static str> {
        let lower = name.to_lowercase();
        FIT_STYLES
            .iter()
            .copied()
            .find(|fit| lower.contains(&fit.to_lowercase()))
    }

    fn design_name(name: &str, product_type: &str, fit: Option<&str>) -> String {
        let mut clean = name.to_string();
        for noise in MATERIAL_NOISE.iter() {
            clean = noise.replace_all(&clean, "").into_owned();
        }
        // Exact-case removal only; a lower-case type stays in the design.
        clean = clean.replace(product_type, "");
        if let Some(fit) = fit {
            clean = clean.replace(fit, "");
        }

        let clean = clean.split_whitespace().collect::<Vec<_>>().join(" ");
        if clean.is_empty() {
            DEFAULT_DESIGN.to_string()
        } else {
            clean
        }
    }
}

/// Composes marketing descriptions for seed products.
pub struct DescriptionGenerator;

impl DescriptionGenerator {
    /// `[intro]. Chất liệu [material]. Phù hợp cho [style].\nKeywords: [...]`
    ///
    /// `name` is a formatted product name; material and style are drawn
    /// from `rng`, so a seeded generator gives reproducible output.
    pub fn generate(name: &str, color: &str, rng: &mut fastrand::Rng) -> String {
        let intro = Self::intro(name);
        let material = MATERIALS[rng.usize(..MATERIALS.len())];
        let style = STYLES[rng.usize(..STYLES.len())];
        let keywords = Self::keywords(name, color);

        format!("{intro}. Chất liệu {material}. Phù hợp cho {style}.\nKeywords: {keywords}.")
    }

    fn design(name: &str) -> Option<String> {
        DESIGN_SUFFIX
            .as_ref()?
            .captures(name)
            .map(|caps| caps[1].trim().to_string())
    }

    fn intro(name: &str) -> String {
        let lower = name.to_lowercase();
        let product_type = capitalize(name.split('-').next().unwrap_or_default().trim());

        let fit = if lower.contains("relaxed fit") {
            "với form rộng thoải mái"
        } else if lower.contains("slim fit") {
            "với form ôm vừa vặn"
        } else if lower.contains("oversized") {
            "với form rộng oversized cá tính"
        } else {
            "với thiết kế hiện đại"
        };

        match Self::design(name) {
            Some(design) if design.chars().count() > 3 => {
                format!("{product_type} {fit}, họa tiết {design} độc đáo và bắt mắt")
            }
            _ => format!("{product_type} {fit}, thiết kế tối giản sang trọng"),
        }
    }

    fn keywords(name: &str, color: &str) -> String {
        let lower = name.to_lowercase();
        let mut keywords = BTreeSet::new();

        let type_words: &[&str] = if lower.contains("áo thun") {
            &["áo thun", "t-shirt", "áo phông"]
        } else if lower.contains("áo sơ mi") {
            &["áo sơ mi", "shirt", "sơ mi"]
        } else if lower.contains("áo khoác") {
            &["áo khoác", "jacket", "khoác"]
        } else if lower.contains("áo hoodie") {
            &["áo hoodie", "hoodie", "áo nỉ"]
        } else {
            &[]
        };
        keywords.extend(type_words.iter().map(|w| w.to_string()));

        if lower.contains("relaxed fit") {
            keywords.insert("áo rộng".to_string());
        } else if lower.contains("slim fit") {
            keywords.insert("áo ôm".to_string());
        } else if lower.contains("oversized") {
            keywords.insert("áo oversized".to_string());
        }

        if !color.is_empty() && !color.eq_ignore_ascii_case("n/a") {
            keywords.insert(format!("áo {}", color.to_lowercase()));
        }

        if let Some(design) = Self::design(name) {
            let design = design.to_lowercase();
            if design.chars().count() > 3 {
                keywords.insert(format!("áo {design}"));
            }
        }

        keywords.into_iter().collect::<Vec<_>>().join(", ")
    }
}
