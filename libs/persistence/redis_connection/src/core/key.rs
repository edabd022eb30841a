use std::borrow::Cow;

pub trait CacheKey {
    type Args<'r>;

    fn get_key_with_args(&self, arg: Self::Args<'_>) -> Cow<'static, str>;
}

/// Key binding addressed by a single argument, such as an entity id or a
/// query fingerprint.
pub trait CacheKeyFor<A: ?Sized>: Send + Sync {
    fn key_for(&self, arg: &A) -> Cow<'static, str>;
}
