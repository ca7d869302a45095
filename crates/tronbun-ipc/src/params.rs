//! Typed, total accessors over a request's `params` object.
//!
//! Nothing here fails: a missing key, a value of the wrong type or an
//! over-long string falls back to the caller's default, and the handler
//! carries on with partial params.

use serde_json::Value;

/// Borrowed view of a `params` subtree.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(&'a Value);

impl<'a> Params<'a> {
    pub fn new(params: &'a Value) -> Self {
        Self(params)
    }

    /// Raw value under `key`, if any.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    /// String under `key`, or `""` when absent, not a string, or at least
    /// `max_len` bytes long.
    pub fn string(&self, key: &str, max_len: usize) -> String {
        match self.value(key) {
            Some(Value::String(s)) if s.len() < max_len => s.clone(),
            _ => String::new(),
        }
    }

    /// Optional variant of [`string`](Self::string) for fields where absence
    /// matters.
    pub fn opt_string(&self, key: &str, max_len: usize) -> Option<String> {
        match self.value(key) {
            Some(Value::String(s)) if s.len() < max_len => Some(s.clone()),
            _ => None,
        }
    }

    /// Integer under `key`, saturated to `i32`. Floats (including `1e5`)
    /// are truncated toward zero.
    pub fn int(&self, key: &str, default: i32) -> i32 {
        match self.value(key) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    i.clamp(i32::MIN as i64, i32::MAX as i64) as i32
                } else if n.as_u64().is_some() {
                    i32::MAX
                } else {
                    // `as` saturates and maps NaN to 0.
                    n.as_f64().map_or(default, |f| f as i32)
                }
            }
            _ => default,
        }
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        match self.value(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            _ => default,
        }
    }

    /// Like [`float`](Self::float) but also accepts a numeric string.
    pub fn float_lenient(&self, key: &str, default: f64) -> f64 {
        match self.value(key) {
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => self.float(key, default),
        }
    }

    /// Boolean flag: JSON booleans, or numbers where nonzero is true.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.value(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(_)) => self.int(key, default as i32) != 0,
            _ => default,
        }
    }

    /// Serialized text of the subtree under `key`, or `""` when absent or
    /// when the text would be `max_len` bytes or more.
    pub fn json(&self, key: &str, max_len: usize) -> String {
        self.value(key)
            .and_then(|v| serde_json::to_string(v).ok())
            .filter(|text| text.len() < max_len)
            .unwrap_or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================
