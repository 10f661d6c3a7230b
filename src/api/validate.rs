use serde::Serialize;

/// A single declarative field rule; each carries the message reported on failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required(&'static str),
    Email(&'static str),
    MinLength(usize, &'static str),
    Range(i64, i64, &'static str),
}

/// Borrowed view of a request field as seen by the rules
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
}

impl FieldValue<'_> {
    fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(v) => v.map(|s| !s.trim().is_empty()).unwrap_or(false),
            FieldValue::Number(v) => v.is_some(),
        }
    }
}

/// A field paired with the static rule set that applies to it
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub rules: &'static [Rule],
}

impl<'a> Field<'a> {
    pub fn text(name: &'static str, value: Option<&'a str>, rules: &'static [Rule]) -> Self {
        Self { name, value: FieldValue::Text(value), rules }
    }

    pub fn number(name: &'static str, value: Option<i64>, rules: &'static [Rule]) -> Self {
        Self { name, value: FieldValue::Number(value), rules }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Request shapes that can be checked field by field.
///
/// Failures come back in declaration order; an absent optional field skips
/// every rule after `Required`.
pub trait Validate {
    fn fields(&self) -> Vec<Field<'_>>;

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors = check(&self.fields());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub fn check(fields: &[Field<'_>]) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for field in fields {
        let present = field.value.is_present();

        for rule in field.rules {
            let failed = match (*rule, field.value) {
                (Rule::Required(_), _) => !present,
                _ if !present => continue,
                (Rule::Email(_), FieldValue::Text(Some(s))) => !is_email(s),
                (Rule::MinLength(min, _), FieldValue::Text(Some(s))) => s.chars().count() < min,
                (Rule::Range(lo, hi, _), FieldValue::Number(Some(n))) => n < lo || n > hi,
                _ => false,
            };

            if failed {
                errors.push(FieldError { field: field.name, message: rule.message() });
                // first failing rule per field is enough
                break;
            }
        }
    }

    errors
}

impl Rule {
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required(m) | Rule::Email(m) | Rule::MinLength(_, m) | Rule::Range(_, _, m) => m,
        }
    }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain without empty labels or whitespace.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}
