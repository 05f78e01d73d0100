//! Built-in style presets and merge precedence.
//!
//! A preset is a named bundle of default style attributes.  Preset-mode
//! submissions merge the preset **under** the caller's explicit values:
//! a field the caller set always wins, a field the caller left unset
//! falls back to the preset.

use crate::request::StyleParams;

/// Names of all built-in presets, in listing order.
pub const PRESET_NAMES: &[&str] = &[
    "professional-chinese",
    "traditional-japanese",
    "modern-korean",
    "elegant-chinese-qipao",
    "casual-lifestyle",
    "fashion-editorial",
    "brazilian-beach",
    "french-elegance",
    "indian-traditional",
    "american-casual",
];

/// Look up a built-in preset by name.
pub fn find_preset(name: &str) -> Option<StyleParams> {
    let p = match name {
        "professional-chinese" => style("知性", "25", "中国", "西装", "黑色", "办公室", "自信"),
        "traditional-japanese" => style("古典", "23", "日本", "和服", "粉色", "花园", "温柔"),
        "modern-korean" => style("现代", "20", "韩国", "连衣裙", "白色", "城市", "活泼"),
        "elegant-chinese-qipao" => style("优雅", "24", "中国", "旗袍", "红色", "室内", "高贵"),
        "casual-lifestyle" => style("清纯", "22", "中国", "休闲装", "蓝色", "咖啡厅", "甜美"),
        "fashion-editorial" => style("冷艳", "26", "俄罗斯", "晚礼服", "黑色", "城市", "神秘"),
        "brazilian-beach" => style("性感", "24", "巴西", "连衣裙", "黄色", "海边", "热情"),
        "french-elegance" => style("优雅", "27", "法国", "外套", "米色", "咖啡厅", "知性"),
        "indian-traditional" => style("古典", "22", "印度", "民族服装", "红色", "室内", "温柔"),
        "american-casual" => style("活泼", "21", "美国", "牛仔裤", "蓝色", "公园", "开朗"),
        _ => return None,
    };
    Some(p)
}

/// All built-in presets paired with their names, in listing order.
pub fn builtin_presets() -> Vec<(&'static str, StyleParams)> {
    PRESET_NAMES
        .iter()
        .filter_map(|name| find_preset(name).map(|p| (*name, p)))
        .collect()
}

/// Merge `preset` defaults under `overrides`.
///
/// Every field set in `overrides` is kept; unset fields take the
/// preset's value.  Fields unset in both remain unset.
pub fn apply_preset(overrides: &StyleParams, preset: &StyleParams) -> StyleParams {
    StyleParams {
        style: overrides.style.clone().or_else(|| preset.style.clone()),
        age: overrides.age.clone().or_else(|| preset.age.clone()),
        nationality: overrides
            .nationality
            .clone()
            .or_else(|| preset.nationality.clone()),
        clothing: overrides
            .clothing
            .clone()
            .or_else(|| preset.clothing.clone()),
        clothing_color: overrides
            .clothing_color
            .clone()
            .or_else(|| preset.clothing_color.clone()),
        scene: overrides.scene.clone().or_else(|| preset.scene.clone()),
        mood: overrides.mood.clone().or_else(|| preset.mood.clone()),
        hair_style: overrides
            .hair_style
            .clone()
            .or_else(|| preset.hair_style.clone()),
        hair_color: overrides
            .hair_color
            .clone()
            .or_else(|| preset.hair_color.clone()),
        skin_tone: overrides
            .skin_tone
            .clone()
            .or_else(|| preset.skin_tone.clone()),
        accessories: overrides
            .accessories
            .clone()
            .or_else(|| preset.accessories.clone()),
    }
}

/// Preset constructor: all built-ins define exactly these seven fields.
fn style(
    style: &str,
    age: &str,
    nationality: &str,
    clothing: &str,
    clothing_color: &str,
    scene: &str,
    mood: &str,
) -> StyleParams {
    StyleParams {
        style: Some(style.to_string()),
        age: Some(age.to_string()),
        nationality: Some(nationality.to_string()),
        clothing: Some(clothing.to_string()),
        clothing_color: Some(clothing_color.to_string()),
        scene: Some(scene.to_string()),
        mood: Some(mood.to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_preset_resolves() {
        for name in PRESET_NAMES {
            assert!(find_preset(name).is_some(), "missing preset {name}");
        }
        assert_eq!(builtin_presets().len(), PRESET_NAMES.len());
    }

    #[test]
    fn unknown_preset_returns_none() {
        assert!(find_preset("cyberpunk-noir").is_none());
    }

    #[test]
    fn override_replaces_preset_field() {
        let preset = find_preset("modern-korean").unwrap();
        let overrides = StyleParams {
            clothing_color: Some("红色".to_string()),
            ..Default::default()
        };

        let merged = apply_preset(&overrides, &preset);
        // The overridden field takes the caller's value.
        assert_eq!(merged.clothing_color.as_deref(), Some("红色"));
        // Fields absent from the overrides keep the preset's value.
        assert_eq!(merged.style.as_deref(), Some("现代"));
        assert_eq!(merged.nationality.as_deref(), Some("韩国"));
        assert_eq!(merged.scene.as_deref(), Some("城市"));
    }

    #[test]
    fn fields_unset_in_both_stay_unset() {
        let preset = find_preset("casual-lifestyle").unwrap();
        let merged = apply_preset(&StyleParams::default(), &preset);
        assert!(merged.hair_style.is_none());
        assert!(merged.accessories.is_none());
    }
}
