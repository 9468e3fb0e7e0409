use std::collections::BTreeMap;

pub type Vars = BTreeMap<String, String>;

/// Replace every `{{key}}` with `vars[key]`, for each key in `vars`.
///
/// Replacement is literal: values are not escaped, and placeholders whose
/// key is absent from `vars` are left as they are.
pub fn render(template: &str, vars: &Vars) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{{}}}}}", key);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, value);
        }
    }
    out
}

/// Parse `key=value` pairs as given on the command line.
pub fn parse_vars<S: AsRef<str>>(pairs: &[S]) -> Result<Vars, String> {
    let mut vars = Vars::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty key in '{}'", pair));
        }
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}
