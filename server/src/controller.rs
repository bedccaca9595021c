use std::future::IntoFuture;
use std::marker::PhantomData;

/// Shapes an inbound request into a service DTO.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Shapes a service result into an HTTP reply.
pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Request pipeline glue: `intake` a request through the transformer, hand
/// the DTO to a service call, present whatever comes back.
pub struct Controller<T, P> {
    transformer: T,
    presenter: P,
}

impl<T, P> Controller<T, P> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
        }
    }

    pub fn intake<I>(self, input: I) -> Transformed<T, P, T::To>
    where
        T: Intake<I>,
    {
        Transformed {
            transformed: self.transformer.emit(input),
            presenter: self.presenter,
            _transformer: PhantomData,
        }
    }
}

pub struct Transformed<T, P, D> {
    transformed: D,
    presenter: P,
    _transformer: PhantomData<T>,
}

impl<T, P, D> Transformed<T, P, D> {
    pub async fn handle<F, Fut, O, E>(self, f: F) -> Result<P::To, E>
    where
        P: Exhaust<O>,
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.presenter.emit(f(self.transformed).await?))
    }
}
