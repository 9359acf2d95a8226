// Coercion of positional script arguments

use crate::map::HitSounds;
use crate::scripting::{ScriptError, ScriptResult};
use serde_json::Value;

/// Typed, index-checked access to a script call's arguments
///
/// Numbers are lenient: integer slots accept integral floats (`3.0`), float
/// slots accept integers. Everything else must match its JSON type.
#[derive(Debug, Clone, Copy)]
pub struct ArgReader<'a> {
    args: &'a [Value],
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "nothing".to_string(),
        Some(value) => {
            let mut text = value.to_string();
            if text.len() > 40 {
                let mut cut = 40;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
                text.push_str("...");
            }
            text
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    let float = value.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float <= i64::MAX as f64;
    (float.is_finite() && float.fract() == 0.0 && in_range).then_some(float as i64)
}

fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

impl<'a> ArgReader<'a> {
    pub fn new(args: &'a [Value]) -> Self {
        Self { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn error<T>(&self, index: usize, expected: &'static str) -> ScriptResult<T> {
        Err(ScriptError::Argument {
            index,
            expected,
            got: describe(self.args.get(index)),
        })
    }

    /// True when the argument is absent or `null`
    pub fn is_missing(&self, index: usize) -> bool {
        self.args.get(index).is_none_or(Value::is_null)
    }

    pub fn integer(&self, index: usize) -> ScriptResult<i64> {
        match self.args.get(index).and_then(as_integer) {
            Some(int) => Ok(int),
            None => self.error(index, "an integer"),
        }
    }

    pub fn i32(&self, index: usize) -> ScriptResult<i32> {
        match self.integer(index).map(i32::try_from) {
            Ok(Ok(value)) => Ok(value),
            _ => self.error(index, "a 32-bit integer"),
        }
    }

    pub fn u32(&self, index: usize) -> ScriptResult<u32> {
        match self.integer(index).map(u32::try_from) {
            Ok(Ok(value)) => Ok(value),
            _ => self.error(index, "a non-negative integer"),
        }
    }

    pub fn id(&self, index: usize) -> ScriptResult<u64> {
        match self.integer(index).map(u64::try_from) {
            Ok(Ok(value)) => Ok(value),
            _ => self.error(index, "an id"),
        }
    }

    pub fn float(&self, index: usize) -> ScriptResult<f32> {
        match self.args.get(index).and_then(Value::as_f64) {
            Some(float) => Ok(float as f32),
            None => self.error(index, "a number"),
        }
    }

    pub fn bool(&self, index: usize) -> ScriptResult<bool> {
        match self.args.get(index).and_then(Value::as_bool) {
            Some(flag) => Ok(flag),
            None => self.error(index, "a boolean"),
        }
    }

    pub fn string(&self, index: usize) -> ScriptResult<String> {
        match self.args.get(index).and_then(Value::as_str) {
            Some(text) => Ok(text.to_string()),
            None => self.error(index, "a string"),
        }
    }

    /// `[r, g, b]` with 0-255 channels, or `"#rrggbb"`
    pub fn color(&self, index: usize) -> ScriptResult<[u8; 3]> {
        let parsed = match self.args.get(index) {
            Some(Value::String(text)) => parse_hex_color(text),
            Some(Value::Array(items)) if items.len() == 3 => {
                let mut color = [0u8; 3];
                let mut valid = true;
                for (slot, item) in color.iter_mut().zip(items) {
                    match as_integer(item).map(u8::try_from) {
                        Some(Ok(channel)) => *slot = channel,
                        _ => valid = false,
                    }
                }
                valid.then_some(color)
            }
            _ => None,
        };
        match parsed {
            Some(color) => Ok(color),
            None => self.error(index, "a color"),
        }
    }

    /// An array of entity ids
    pub fn ids(&self, index: usize) -> ScriptResult<Vec<u64>> {
        let Some(items) = self.args.get(index).and_then(Value::as_array) else {
            return self.error(index, "a list of ids");
        };
        let ids: Option<Vec<u64>> = items
            .iter()
            .map(|item| as_integer(item).and_then(|int| u64::try_from(int).ok()))
            .collect();
        match ids {
            Some(ids) => Ok(ids),
            None => self.error(index, "a list of ids"),
        }
    }

    /// A bitmask (`2`) or a hitsound name (`"whistle"`)
    pub fn hitsounds(&self, index: usize) -> ScriptResult<HitSounds> {
        let parsed = match self.args.get(index) {
            Some(Value::String(name)) => HitSounds::from_script_name(name),
            Some(value) => as_integer(value)
                .and_then(|bits| u8::try_from(bits).ok())
                .and_then(HitSounds::from_bits),
            None => None,
        };
        match parsed {
            Some(sounds) if !sounds.is_empty() => Ok(sounds),
            _ => self.error(index, "a hitsound"),
        }
    }

    /// A nested list, e.g. the items of a batch
    pub fn list(&self, index: usize) -> ScriptResult<&'a [Value]> {
        match self.args.get(index).and_then(Value::as_array) {
            Some(items) => Ok(items.as_slice()),
            None => self.error(index, "a list"),
        }
    }

    /// Each element of the list at `index` read as its own argument list
    pub fn rows(&self, index: usize) -> ScriptResult<Vec<ArgReader<'a>>> {
        let items = self.list(index)?;
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            match item.as_array() {
                Some(row) => rows.push(ArgReader::new(row)),
                None => return self.error(index, "a list of lists"),
            }
        }
        Ok(rows)
    }
}
