//! Chain inspection over `std::error::Error::source`.
//!
//! These work on any `&dyn Error`, not only on records from this crate. The
//! single-level relation is `source()`; the only addition is [`Joined`],
//! whose members are all visited (depth-first, in order) by [`walk`], [`is`]
//! and [`find`].

use std::error::Error as StdError;
use std::fmt;

use crate::ErrorValue;

/// The immediate cause of `err`, if any.
///
/// A [`Joined`] has no single cause and returns `None`.
pub fn unwrap_one<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Reports whether any error in the tree of `err` equals `target`.
///
/// Equality is `T`'s `PartialEq`, so a type can make distinct values
/// equivalent by how it implements it. [`Error`](crate::Error) records are
/// not `PartialEq`; match them with [`is_by`].
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    walk(err).any(|e| e.downcast_ref::<T>() == Some(target))
}

/// Reports whether any error in the tree of `err` satisfies `pred`.
///
/// ```rust
/// use annotated_error::{chain, Error};
///
/// let err = Error::wrap("handler", Error::new("db", "connection reset"));
/// let from_db = chain::is_by(&err, |e| {
///     e.downcast_ref::<Error>().is_some_and(|r| r.kind() == "db")
/// });
/// assert!(from_db);
/// ```
pub fn is_by<F>(err: &(dyn StdError + 'static), mut pred: F) -> bool
where
    F: FnMut(&(dyn StdError + 'static)) -> bool,
{
    walk(err).any(|e| pred(e))
}

/// The first error in the tree of `err` that is a `T`.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    walk(err).find_map(|e| e.downcast_ref::<T>())
}

/// Iterate `err` and everything reachable from it.
pub fn walk<'a>(err: &'a (dyn StdError + 'static)) -> Walk<'a> {
    Walk { stack: vec![err] }
}

/// Depth-first iterator returned by [`walk`].
pub struct Walk<'a> {
    stack: Vec<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let err = self.stack.pop()?;
        if let Some(joined) = err.downcast_ref::<Joined>() {
            self.stack
                .extend(joined.errors().iter().rev().map(ErrorValue::as_dyn));
        } else if let Some(source) = err.source() {
            self.stack.push(source);
        }
        Some(err)
    }
}

/// Combine errors into one. Absent members are dropped; if nothing is left
/// the result is `None`.
///
/// ```rust
/// use annotated_error::{chain, Error, ErrorValue};
///
/// let joined = chain::join([
///     None,
///     Some(ErrorValue::from(Error::new("db", "primary down"))),
///     None,
///     Some(ErrorValue::from(Error::new("db", "replica down"))),
/// ]);
/// assert_eq!(joined.map(|j| j.to_string()), Some("primary down\nreplica down".to_string()));
///
/// assert!(chain::join([None, None]).is_none());
/// ```
pub fn join<I>(errs: I) -> Option<Joined>
where
    I: IntoIterator<Item = Option<ErrorValue>>,
{
    let errors: Vec<ErrorValue> = errs.into_iter().flatten().collect();
    if errors.is_empty() {
        None
    } else {
        Some(Joined { errors })
    }
}

/// Several errors combined by [`join`].
#[derive(Debug)]
pub struct Joined {
    errors: Vec<ErrorValue>,
}

impl Joined {
    /// The member errors, in join order.
    pub fn errors(&self) -> &[ErrorValue] {
        &self.errors
    }
}

impl fmt::Display for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl StdError for Joined {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("not found: {0}")]
    struct NotFound(&'static str);

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("timed out")]
    struct TimedOut;

    #[test]
    fn test_unwrap_one() {
        let err = Error::wrap("lookup", ErrorValue::foreign(NotFound("user")));
        let parent = unwrap_one(&err).and_then(|e| e.downcast_ref::<NotFound>());
        assert_eq!(parent, Some(&NotFound("user")));

        let root = Error::new("lookup", "missing");
        assert!(unwrap_one(&root).is_none());
    }

    #[test]
    fn test_unwrap_one_record_parent() {
        let err = Error::wrap("handler", Error::new("db", "connection reset"));
        let parent = unwrap_one(&err).and_then(|e| e.downcast_ref::<Error>());
        assert_eq!(parent.map(Error::kind), Some("db"));
        assert_eq!(unwrap_one(&err).map(|e| e.to_string()), Some(err.to_string()));
    }

    #[test]
    fn test_is() {
        let err = Error::wrap("lookup", ErrorValue::foreign(NotFound("user")));
        assert!(is(&err, &NotFound("user")));
        assert!(!is(&err, &NotFound("order")));
        assert!(!is(&err, &TimedOut));
    }

    #[test]
    fn test_is_deep_chain() {
        let inner = Error::wrap("io", ErrorValue::foreign(TimedOut));
        let outer = Error::wrap("service", Error::wrap("client", inner));
        assert!(is(&outer, &TimedOut));
    }

    #[test]
    fn test_is_by_record_target() {
        let err = Error::wrap("service", Error::wrap("client", Error::new("db", "connection reset")));
        assert!(is_by(&err, |e| e
            .downcast_ref::<Error>()
            .is_some_and(|r| r.kind() == "db")));
        assert!(!is_by(&err, |e| e
            .downcast_ref::<Error>()
            .is_some_and(|r| r.kind() == "cache")));
    }

    #[test]
    fn test_is_by_joined_members() {
        let joined = join([
            Some(ErrorValue::from(Error::new("a", "first"))),
            Some(ErrorValue::from(Error::new("b", "second"))),
        ]);
        let hit = joined
            .as_ref()
            .map(|j| is_by(j, |e| e.downcast_ref::<Error>().is_some_and(|r| r.kind() == "b")));
        assert_eq!(hit, Some(true));
    }

    #[test]
    fn test_find_outlives_walk() {
        let err = Error::wrap("client", ErrorValue::foreign(TimedOut));
        let found: Option<&TimedOut> = find(&err);
        drop(walk(&err));
        assert_eq!(found, Some(&TimedOut));
    }

    #[test]
    fn test_find() {
        let err = Error::wrap("client", Error::wrap("io", ErrorValue::foreign(NotFound("cfg"))));
        assert_eq!(find::<NotFound>(&err), Some(&NotFound("cfg")));
        assert!(find::<TimedOut>(&err).is_none());

        // The record itself is the first match for its own type.
        assert_eq!(find::<Error>(&err).map(Error::kind), Some("client"));
    }

    #[test]
    fn test_join_discards_absent() {
        let joined = join([
            None,
            Some(ErrorValue::foreign(NotFound("a"))),
            None,
            Some(ErrorValue::foreign(TimedOut)),
        ]);
        let joined = joined.as_ref();
        assert_eq!(joined.map(|j| j.errors().len()), Some(2));
        assert_eq!(
            joined.map(|j| j.to_string()),
            Some("not found: a\ntimed out".to_string())
        );

        let visited: Vec<String> = joined
            .map(|j| walk(j).map(|e| e.to_string()).collect())
            .unwrap_or_default();
        assert_eq!(visited, vec!["not found: a\ntimed out", "not found: a", "timed out"]);
    }

    #[test]
    fn test_join_all_absent() {
        assert!(join([None, None]).is_none());
        assert!(join(Vec::new()).is_none());
    }

    #[test]
    fn test_join_fan_out() {
        let joined = join([
            Some(ErrorValue::from(Error::wrap("a", ErrorValue::foreign(NotFound("x"))))),
            Some(ErrorValue::foreign(TimedOut)),
        ]);
        let wrapped = joined.map(|j| Error::wrap("batch", j));
        let wrapped = wrapped.as_ref();

        assert_eq!(wrapped.map(|w| is(w, &NotFound("x"))), Some(true));
        assert_eq!(wrapped.map(|w| is(w, &TimedOut)), Some(true));
        assert_eq!(wrapped.map(|w| is(w, &NotFound("y"))), Some(false));
    }

    #[test]
    fn test_joined_has_no_single_parent() {
        let joined = join([Some(ErrorValue::foreign(TimedOut))]);
        assert_eq!(joined.as_ref().map(|j| unwrap_one(j).is_none()), Some(true));
    }

    #[test]
    fn test_walk_order() {
        let err = Error::wrap("outer", Error::wrap("inner", ErrorValue::foreign(TimedOut)));
        let kinds: Vec<Option<String>> = walk(&err)
            .map(|e| e.downcast_ref::<Error>().map(|r| r.kind().to_string()))
            .collect();
        assert_eq!(
            kinds,
            vec![Some("outer".to_string()), Some("inner".to_string()), None]
        );
    }
}
