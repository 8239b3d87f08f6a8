use serde_json::Value;

use super::{ContentProtocolHandler, parse_boolean_text};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContentProtocolHandler;

impl JsonContentProtocolHandler {
    pub fn read_value(&self, content: &str, path: Option<&str>) -> Option<Value> {
        let json: Value = match serde_json::from_str(content) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Error parsing JSON content: {}", e);
                return None;
            }
        };

        match path {
            None => Some(json),
            Some(path) => json.pointer(&to_json_pointer(path)?).cloned(),
        }
    }
}

impl ContentProtocolHandler for JsonContentProtocolHandler {
    fn extract_boolean(&self, content: &str, path: Option<&str>) -> Option<bool> {
        match self.read_value(content, path)? {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => parse_boolean_text(&s),
            _ => None,
        }
    }
}

//supports JSON pointers as is and simple JSON paths like $.a.b[0]
fn to_json_pointer(path: &str) -> Option<String> {
    let path = path.trim();
    if path.starts_with('/') {
        return Some(path.to_owned());
    }

    let path = path.strip_prefix('$').unwrap_or(path);
    let mut pointer = String::new();

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (key, indices) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };

        if !key.is_empty() {
            pointer.push('/');
            pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
        }

        for index in indices.split('[').filter(|s| !s.is_empty()) {
            let index = index.strip_suffix(']')?;
            index.parse::<usize>().ok()?;
            pointer.push('/');
            pointer.push_str(index);
        }
    }

    Some(pointer)
}
