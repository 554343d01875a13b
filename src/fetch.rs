//! Fetcher contract used by the coordinator to obtain a fresh token.
//!
//! The coordinator never parses transport responses; a fetcher hands back an already-extracted
//! [`CsrfToken`]. [`ReqwestFetcher`](crate::http::ReqwestFetcher) covers the HTTP token route and
//! [`fetch_fn`] adapts any async closure.

// self
use crate::{_prelude::*, error::FetchError, token::CsrfToken};

/// Boxed future returned by [`TokenFetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<CsrfToken, FetchError>> + 'a + Send>>;

/// Asynchronous source of fresh CSRF tokens.
pub trait TokenFetcher
where
	Self: Send + Sync,
{
	/// Performs one acquisition round trip.
	fn fetch(&self) -> FetchFuture<'_>;
}

/// [`TokenFetcher`] backed by an async closure.
#[derive(Clone)]
pub struct FnFetcher<F>(F);
impl<F, Fut> TokenFetcher for FnFetcher<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<CsrfToken, FetchError>>,
{
	fn fetch(&self) -> FetchFuture<'_> {
		Box::pin((self.0)())
	}
}
impl<F> Debug for FnFetcher<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnFetcher(..)")
	}
}

/// Wraps an async closure as a [`TokenFetcher`].
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<CsrfToken, FetchError>>,
{
	FnFetcher(f)
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test]
	async fn closure_fetcher_runs_once_per_call() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let fetcher = fetch_fn(move || {
			counter.fetch_add(1, Ordering::SeqCst);

			async { Ok::<_, FetchError>(CsrfToken::new("tok")) }
		});
		let token = fetcher.fetch().await.expect("Closure fetcher should succeed.");

		assert_eq!(token.expose(), "tok");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
