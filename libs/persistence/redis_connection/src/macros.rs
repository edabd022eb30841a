/// Declares a unit struct that renders a cache key.
///
/// `cache_key!(EventCacheKey => "entity:event:{}"[id: Uuid]);` also
/// implements [`CacheKeyFor<Uuid>`](crate::core::key::CacheKeyFor), which is
/// what the tiered and query caches are parameterised over.
#[macro_export]
macro_rules! cache_key {
    ($name:ident => $format_key:literal[$arg:ident:$ty:ident]) => {
        #[doc=concat!("Cache key binding\n ## Key \n", $format_key)]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = (&'r $ty,);

            fn get_key_with_args(&self, args: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                let ($arg,) = args;

                (format!($format_key, $arg)).into()
            }
        }

        impl $crate::core::key::CacheKeyFor<$ty> for $name {
            fn key_for(&self, arg: &$ty) -> std::borrow::Cow<'static, str> {
                $crate::core::key::CacheKey::get_key_with_args(self, (arg,))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::key::{CacheKey, CacheKeyFor};

    type Id = u64;

    cache_key!(WidgetKey => "entity:widget:{}"[id: Id]);

    #[test]
    fn test_single_argument_key() {
        assert_eq!(WidgetKey.key_for(&42), "entity:widget:42");
        assert_eq!(WidgetKey.get_key_with_args((&7,)), "entity:widget:7");
    }
}
