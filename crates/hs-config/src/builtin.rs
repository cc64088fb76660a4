//! Built-in spec table for the supported Juggler-family machines.
//!
//! Rows are the published `[BB interval, RB interval]` pairs for settings
//! 1 through 6. BB (big bonus) counts pair with the big-win interval and RB
//! (regular bonus) counts with the small-win interval.

use std::collections::BTreeMap;

use crate::spec_table::{ModelSpec, SettingSpec, SpecTable};
use crate::CONFIG_SCHEMA_VERSION;

/// Fragment used when an observed model name matches nothing.
pub const DEFAULT_MODEL: &str = "マイジャグラー";

const IM_JUGGLER: [[f64; 2]; 6] = [
    [273.1, 439.8],
    [269.7, 399.6],
    [269.7, 331.0],
    [259.0, 315.1],
    [259.0, 255.0],
    [255.0, 255.0],
];

const FUNKY_JUGGLER: [[f64; 2]; 6] = [
    [268.6, 439.8],
    [264.3, 399.6],
    [260.1, 331.0],
    [249.2, 291.3],
    [240.9, 257.0],
    [237.4, 237.4],
];

const MY_JUGGLER: [[f64; 2]; 6] = [
    [273.1, 439.8],
    [269.7, 399.6],
    [269.7, 331.0],
    [259.0, 315.1],
    [259.0, 255.0],
    [240.9, 204.8],
];

const HAPPY_JUGGLER: [[f64; 2]; 6] = [
    [273.1, 439.8],
    [269.7, 399.6],
    [269.7, 331.0],
    [259.0, 315.1],
    [259.0, 255.0],
    [240.9, 240.9],
];

/// Shared by GoGo, Girls, and Mister.
const GOGO_FAMILY: [[f64; 2]; 6] = [
    [268.6, 374.5],
    [267.5, 354.2],
    [260.1, 331.0],
    [249.2, 291.3],
    [240.9, 257.0],
    [237.4, 237.4],
];

const ULTRA_MIRACLE: [[f64; 2]; 6] = [
    [267.5, 425.6],
    [261.1, 402.1],
    [256.0, 350.5],
    [242.7, 322.8],
    [233.2, 297.9],
    [216.3, 277.7],
];

/// Declaration order is the match order.
const MODELS: [(&str, &[[f64; 2]; 6]); 8] = [
    ("アイムジャグラー", &IM_JUGGLER),
    ("ファンキージャグラー", &FUNKY_JUGGLER),
    ("マイジャグラー", &MY_JUGGLER),
    ("ハッピージャグラー", &HAPPY_JUGGLER),
    ("ゴーゴージャグラー", &GOGO_FAMILY),
    ("ジャグラーガールズ", &GOGO_FAMILY),
    ("ミスタージャグラー", &GOGO_FAMILY),
    ("ウルトラミラクル", &ULTRA_MIRACLE),
];

fn model(name: &str, rows: &[[f64; 2]; 6]) -> ModelSpec {
    let settings: BTreeMap<u8, SettingSpec> = rows
        .iter()
        .zip(1u8..)
        .map(|(&[bb, rb], setting)| (setting, SettingSpec::new(rb, bb)))
        .collect();
    ModelSpec {
        name: name.to_string(),
        settings,
    }
}

/// The table compiled into the binary.
pub fn builtin_spec_table() -> SpecTable {
    SpecTable {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        description: Some("Built-in Juggler family spec table".to_string()),
        default_model: DEFAULT_MODEL.to_string(),
        models: MODELS.iter().map(|(name, rows)| model(name, rows)).collect(),
    }
}
