//! Creator and merger function values
//!
//! `create*` and `merge*` operations take the function they apply as an
//! explicit value rather than an implicit default argument. Each value
//! carries a name so callers can see which function a reducer was built
//! with.

use normal_core::{Record, ShallowMerge};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type CreateFn<R> = dyn Fn(R) -> R + Send + Sync;
type MergeFn<R> = dyn Fn(&R, &R) -> R + Send + Sync;

/// Transforms raw input data into a record before insertion
pub struct Creator<R> {
    name: Cow<'static, str>,
    f: Arc<CreateFn<R>>,
}

impl<R: Record + 'static> Creator<R> {
    /// The default creator: the input is stored as given
    pub fn identity() -> Self {
        Creator {
            name: Cow::Borrowed("identity"),
            f: Arc::new(|data| data),
        }
    }
}

impl<R> Creator<R> {
    /// Wrap a creation function under a name
    pub fn new<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(R) -> R + Send + Sync + 'static,
    {
        Creator {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Name of the wrapped function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the creator
    pub fn apply(&self, data: R) -> R {
        (self.f)(data)
    }
}

impl<R: Record + 'static> Default for Creator<R> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<R> Clone for Creator<R> {
    fn clone(&self) -> Self {
        Creator {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<R> fmt::Debug for Creator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Creator").field(&self.name).finish()
    }
}

/// Combines an existing record with a partial update
pub struct Merger<R> {
    name: Cow<'static, str>,
    f: Arc<MergeFn<R>>,
}

impl<R: ShallowMerge + 'static> Merger<R> {
    /// The default merger: right-biased shallow overwrite
    pub fn shallow() -> Self {
        Merger {
            name: Cow::Borrowed("shallow"),
            f: Arc::new(|existing: &R, patch: &R| existing.shallow_merge(patch)),
        }
    }
}

impl<R> Merger<R> {
    /// Wrap a merge function under a name
    pub fn new<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&R, &R) -> R + Send + Sync + 'static,
    {
        Merger {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Name of the wrapped function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merge `patch` into `existing`
    pub fn apply(&self, existing: &R, patch: &R) -> R {
        (self.f)(existing, patch)
    }
}

impl<R: ShallowMerge + 'static> Default for Merger<R> {
    fn default() -> Self {
        Self::shallow()
    }
}

impl<R> Clone for Merger<R> {
    fn clone(&self) -> Self {
        Merger {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<R> fmt::Debug for Merger<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Merger").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_core::Entity;
    use serde_json::json;

    #[test]
    fn test_identity_creator_returns_input() {
        let c = Creator::<Entity>::identity();
        let e = Entity::new("foo").with("a", 1);
        assert_eq!(c.apply(e.clone()), e);
        assert_eq!(c.name(), "identity");
    }

    #[test]
    fn test_custom_creator_is_named() {
        let c = Creator::new("stamp", |e: Entity| e.with("created", true));
        assert_eq!(c.name(), "stamp");
        assert_eq!(c.apply(Entity::new("x")).get("created"), Some(&json!(true)));
        assert_eq!(format!("{:?}", c), "Creator(\"stamp\")");
    }

    #[test]
    fn test_shallow_merger() {
        let m = Merger::<Entity>::default();
        assert_eq!(m.name(), "shallow");
        let merged = m.apply(
            &Entity::new("a").with("x", 1).with("y", 1),
            &Entity::new("a").with("y", 2),
        );
        assert_eq!(merged.into_value(), json!({"id": "a", "x": 1, "y": 2}));
    }

    #[test]
    fn test_clone_shares_function() {
        let m = Merger::new("keep", |existing: &Entity, _: &Entity| existing.clone());
        let m2 = m.clone();
        assert_eq!(m2.name(), "keep");
        let kept = m2.apply(&Entity::new("a").with("v", 1), &Entity::new("a").with("v", 2));
        assert_eq!(kept.get("v"), Some(&json!(1)));
    }
}
