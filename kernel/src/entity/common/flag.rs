use std::marker::PhantomData;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct IsActive<T>(bool, PhantomData<T>);

impl<T> IsActive<T> {
    pub fn new(value: impl Into<bool>) -> Self {
        IsActive(value.into(), PhantomData)
    }
}
