use crate::error::TypeMismatchError;

use std::any::Any;
use std::sync::Arc;

/// Moves `value` out as a `V` if its runtime type is `V`.
///
/// A type-erased `Arc<dyn Any + Send + Sync>` is looked into: the check
/// applies to the value it holds, which is cloned out unless the `Arc` is
/// unique.
pub(crate) fn checked_cast<T, V>(value: T) -> Result<V, TypeMismatchError>
where
    T: Any + Send + Sync,
    V: Any + Clone + Send + Sync,
{
    let mut slot = Some(value);
    let any = &mut slot as &mut dyn Any;

    if let Some(value) = any.downcast_mut::<Option<V>>().and_then(Option::take) {
        return Ok(value);
    }

    if let Some(erased) = any
        .downcast_mut::<Option<Arc<dyn Any + Send + Sync>>>()
        .and_then(Option::take)
    {
        return match erased.downcast::<V>() {
            Ok(value) => Ok(Arc::unwrap_or_clone(value)),
            Err(erased) => Err(TypeMismatchError::erased::<V>(erased)),
        };
    }

    match slot {
        Some(value) => Err(TypeMismatchError::new::<V, T>(value)),
        None => unreachable!("the value is only taken by a successful cast"),
    }
}
