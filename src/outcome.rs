/// Result of a call to an upstream service.
///
/// Upstream failures never turn into error responses. Handlers decide what
/// to serve for each variant, which keeps the fallback visible at the call
/// site instead of buried in a catch-all.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The upstream answered and the answer was usable.
    Success(T),
    /// A fallback value: the feature is disabled, or the answer could only
    /// be partially interpreted.
    Degraded(T),
    /// The upstream call failed.
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Take the carried value, or build one from the failure reason.
    pub fn resolve<F>(self, on_failure: F) -> T
    where
        F: FnOnce(String) -> T,
    {
        match self {
            Outcome::Success(value) | Outcome::Degraded(value) => value,
            Outcome::Failure(reason) => on_failure(reason),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Degraded(value) => Outcome::Degraded(f(value)),
            Outcome::Failure(reason) => Outcome::Failure(reason),
        }
    }
}

impl<T: Default> Outcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.resolve(|_| T::default())
    }
}
