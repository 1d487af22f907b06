//! garde rules that carry the messages shown to API clients.

use garde::Error;

/// A non-empty string of at most `max` characters.
///
/// Fails with "{label} is required" or "{label} too long".
pub fn required(label: &'static str, max: usize) -> impl Fn(&String, &()) -> garde::Result {
    move |value, _| {
        let chars = value.chars().count();
        if chars == 0 {
            Err(Error::new(format!("{label} is required")))
        } else if chars > max {
            Err(Error::new(format!("{label} too long")))
        } else {
            Ok(())
        }
    }
}

/// A possibly empty string of at most `max` characters.
pub fn at_most(label: &'static str, max: usize) -> impl Fn(&String, &()) -> garde::Result {
    move |value, _| {
        if value.chars().count() > max {
            Err(Error::new(format!("{label} too long")))
        } else {
            Ok(())
        }
    }
}

/// A string of at least `min` characters, failing with `message`.
pub fn at_least(min: usize, message: &'static str) -> impl Fn(&String, &()) -> garde::Result {
    move |value, _| {
        if value.chars().count() < min {
            Err(Error::new(message))
        } else {
            Ok(())
        }
    }
}

/// Applies `rule` only when the value is present.
pub fn optional<T>(
    rule: impl Fn(&T, &()) -> garde::Result,
) -> impl Fn(&Option<T>, &()) -> garde::Result {
    move |value, ctx| match value {
        Some(value) => rule(value, ctx),
        None => Ok(()),
    }
}

#[allow(clippy::ptr_arg)]
pub fn email_address(value: &String, _ctx: &()) -> garde::Result {
    garde::rules::email::apply(value, ()).map_err(|_| Error::new("Invalid email address"))
}
