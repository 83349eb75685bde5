//! Text forms of cell values: search strings, table cells, detail rows.

use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Placeholder for missing or empty values.
pub const ABSENT: &str = "-";

const MAX_CELL_CHARS: usize = 50;
const MAX_CELL_ITEMS: usize = 3;

/// Plain string form used for search and filtering.
///
/// Arrays join their items with `,`; objects become compact JSON.
pub fn stringify(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => format_number(n),
    Value::String(s) => s.clone(),
    Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
    Value::Object(_) => value.to_string(),
  }
}

/// Shortest form: `1`, `2.5`, `-0.125`.
pub fn format_number(n: &Number) -> String {
  if n.is_i64() || n.is_u64() {
    return n.to_string();
  }
  match n.as_f64() {
    Some(f) if f == 0.0 => "0".to_string(),
    Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
    Some(f) => f.to_string(),
    None => n.to_string(),
  }
}

/// Case-insensitive substring test used by search and column filters.
pub fn contains_ignore_case(value: &Value, needle: &str) -> bool {
  stringify(value)
    .to_lowercase()
    .contains(&needle.to_lowercase())
}

/// Compact table cell.
///
/// Booleans read `Yes`/`No`, arrays show at most three items, objects
/// show their field count, and long strings are cut at 50 characters.
pub fn format_display(value: Option<&Value>) -> String {
  let Some(value) = value else {
    return ABSENT.to_string();
  };

  match value {
    Value::Null => ABSENT.to_string(),
    Value::Bool(b) => yes_no(*b).to_string(),
    Value::Array(items) if items.is_empty() => ABSENT.to_string(),
    Value::Array(items) if items.len() <= MAX_CELL_ITEMS => join_items(items),
    Value::Array(items) => format!(
      "{}... (+{})",
      join_items(&items[..MAX_CELL_ITEMS]),
      items.len() - MAX_CELL_ITEMS
    ),
    Value::Object(fields) if fields.is_empty() => ABSENT.to_string(),
    Value::Object(fields) => {
      let n = fields.len();
      format!("{{{} field{}}}", n, if n > 1 { "s" } else { "" })
    }
    Value::String(s) if s.is_empty() => ABSENT.to_string(),
    Value::String(s) => truncate_chars(s, MAX_CELL_CHARS),
    Value::Number(n) => format_number(n),
  }
}

/// Full-length form for the detail view. Objects are pretty-printed.
pub fn format_detail(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => ABSENT.to_string(),
    Some(Value::Bool(b)) => yes_no(*b).to_string(),
    Some(Value::Array(items)) if items.is_empty() => ABSENT.to_string(),
    Some(Value::Array(items)) => join_items(items),
    Some(Value::String(s)) if s.is_empty() => ABSENT.to_string(),
    Some(v @ Value::Object(_)) => {
      serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
    }
    Some(v) => stringify(v),
  }
}

fn yes_no(b: bool) -> &'static str {
  if b {
    "Yes"
  } else {
    "No"
  }
}

fn join_items(items: &[Value]) -> String {
  items.iter().map(stringify).collect::<Vec<_>>().join(", ")
}

fn truncate_chars(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    Some((idx, _)) => format!("{}...", &s[..idx]),
    None => s.to_string(),
  }
}

/// Euro amount the way French locales write it: `1 234 567,89 €`.
///
/// Groups use a narrow no-break space, the symbol a no-break space.
pub fn format_currency(amount: f64) -> String {
  if !amount.is_finite() {
    return ABSENT.to_string();
  }

  let fixed = format!("{:.2}", amount.abs());
  let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

  let mut grouped = String::with_capacity(int_part.len() * 2);
  for (i, c) in int_part.chars().enumerate() {
    if i > 0 && (int_part.len() - i) % 3 == 0 {
      grouped.push('\u{202F}');
    }
    grouped.push(c);
  }

  let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
    "-"
  } else {
    ""
  };
  format!("{}{},{}\u{A0}€", sign, grouped, frac_part)
}

/// Ratio as a percentage with one decimal: `0.425` → `42.5%`.
pub fn format_percent(ratio: f64) -> String {
  if !ratio.is_finite() {
    return ABSENT.to_string();
  }
  format!("{:.1}%", ratio * 100.0)
}

/// Folds accented Latin letters to their base form, lowercased.
fn fold(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars().flat_map(char::to_lowercase) {
    match c {
      'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
      'æ' => out.push_str("ae"),
      'ç' | 'ć' | 'č' => out.push('c'),
      'ď' | 'đ' => out.push('d'),
      'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => out.push('e'),
      'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => out.push('i'),
      'ł' => out.push('l'),
      'ñ' | 'ń' | 'ň' => out.push('n'),
      'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => out.push('o'),
      'œ' => out.push_str("oe"),
      'ř' => out.push('r'),
      'ß' => out.push_str("ss"),
      'ś' | 'š' | 'ş' => out.push('s'),
      'ť' | 'ţ' => out.push('t'),
      'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => out.push('u'),
      'ý' | 'ÿ' => out.push('y'),
      'ź' | 'ż' | 'ž' => out.push('z'),
      other => out.push(other),
    }
  }
  out
}

/// Case-insensitive, accent-aware string ordering.
///
/// `é` sorts with `e`, not after `z`; exact ties fall back to the lowercase form.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
  fold(a)
    .cmp(&fold(b))
    .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

/// Ordering of two present values: numeric when both are numbers.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
  if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
    if a.is_number() && b.is_number() {
      return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
  }
  locale_cmp(&stringify(a), &stringify(b))
}
