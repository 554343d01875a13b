//! Single-flight token acquisition.
//!
//! [`TokenCoordinator::ensure_token`] returns immediately when the shared store already holds a
//! valid token. Otherwise the first caller publishes a *flight* (an async mutex it holds for the
//! whole fetch) into the coordinator's slot and invokes the fetcher exactly once; every caller
//! arriving while the slot is occupied awaits that flight instead of fetching. The leader writes
//! the token into the store, clears the slot, and only then releases the flight, so waiters
//! always wake to the stored value. A failed flight is reported to its leader alone; waiters
//! re-enter acquisition from the top and may lead the next flight themselves.

mod metrics;

pub use metrics::CoordinatorMetrics;

// crates.io
use async_lock::MutexGuardArc;
// self
use crate::{
	_prelude::*,
	error::FetchError,
	fetch::TokenFetcher,
	obs::{self, EnsureOutcome, EnsureSpan},
	store::TokenStore,
	token::{self, CsrfToken},
};

type Flight = Arc<AsyncMutex<()>>;
type FlightSlot = Arc<Mutex<Option<Flight>>>;

/// Shared acquisition state for one token store.
///
/// Clones share the store, the in-flight slot, and the counters, so a single coordinator created
/// at startup can be handed to every consumer.
#[derive(Clone)]
pub struct TokenCoordinator {
	store: Arc<dyn TokenStore>,
	flight: FlightSlot,
	metrics: Arc<CoordinatorMetrics>,
}
impl TokenCoordinator {
	/// Creates a coordinator guarding `store`.
	pub fn new(store: Arc<dyn TokenStore>) -> Self {
		Self { store, flight: Default::default(), metrics: Default::default() }
	}

	/// Returns the current shared token without touching the network.
	pub fn read(&self) -> Option<CsrfToken> {
		self.store.read()
	}

	/// Adopts a token observed elsewhere (e.g. rendered into the page by the server).
	///
	/// Returns `true` when the candidate was valid and has been stored.
	pub fn observe(&self, candidate: &CsrfToken) -> bool {
		if !token::is_valid(Some(candidate)) {
			return false;
		}

		self.store.write(candidate.clone());

		true
	}

	/// Drops the shared token so the next acquisition fetches again.
	pub fn invalidate(&self) {
		self.store.invalidate();
	}

	/// Returns the acquisition counters.
	pub fn metrics(&self) -> &CoordinatorMetrics {
		&self.metrics
	}

	/// Ensures the store holds a valid token, fetching it at most once across concurrent callers.
	///
	/// Callers should re-read the store afterwards instead of caching the value themselves.
	pub async fn ensure_token<F>(&self, fetcher: &F) -> Result<()>
	where
		F: ?Sized + TokenFetcher,
	{
		let span = EnsureSpan::new("ensure_token");

		self.metrics.record_attempt();
		obs::record_ensure_outcome(EnsureOutcome::Attempt);

		let result = span.instrument(self.acquire(fetcher)).await;
		let outcome = match &result {
			Ok(outcome) => *outcome,
			Err(_) => EnsureOutcome::Failure,
		};

		span.record_outcome(outcome);
		obs::record_ensure_outcome(outcome);

		result.map(|_| ())
	}

	async fn acquire<F>(&self, fetcher: &F) -> Result<EnsureOutcome>
	where
		F: ?Sized + TokenFetcher,
	{
		let mut joined = false;

		loop {
			if token::is_valid(self.store.read().as_ref()) {
				return Ok(self.resolved(joined));
			}

			match self.join_or_lead() {
				Role::Ready => return Ok(self.resolved(joined)),
				Role::Follower(flight) => {
					self.metrics.record_wait();

					joined = true;

					// Resolves once the leader has settled and released the flight.
					drop(flight.lock().await);
				},
				Role::Leader(lease) => return self.lead(fetcher, lease).await,
			}
		}
	}

	fn resolved(&self, joined: bool) -> EnsureOutcome {
		if joined {
			return EnsureOutcome::Joined;
		}

		self.metrics.record_reuse();

		EnsureOutcome::Reused
	}

	fn join_or_lead(&self) -> Role {
		let mut slot = self.flight.lock();

		if let Some(flight) = slot.as_ref() {
			return Role::Follower(flight.clone());
		}
		// A flight may have stored its token and cleared the slot since the unlocked check.
		if token::is_valid(self.store.read().as_ref()) {
			return Role::Ready;
		}

		let flight: Flight = Arc::new(AsyncMutex::new(()));
		// A freshly created flight is never contended.
		let Some(held) = flight.try_lock_arc() else {
			return Role::Follower(flight);
		};

		*slot = Some(flight.clone());

		Role::Leader(FlightLease { slot: self.flight.clone(), flight, _held: held })
	}

	async fn lead<F>(&self, fetcher: &F, lease: FlightLease) -> Result<EnsureOutcome>
	where
		F: ?Sized + TokenFetcher,
	{
		self.metrics.record_fetch();

		let result: Result<EnsureOutcome> = match fetcher.fetch().await {
			Ok(token) if token::is_valid(Some(&token)) => {
				self.store.write(token);

				Ok(EnsureOutcome::Fetched)
			},
			Ok(_) => Err(FetchError::EmptyToken.into()),
			Err(err) => Err(err.into()),
		};

		if result.is_err() {
			self.metrics.record_failure();
		}

		drop(lease);

		result
	}
}
impl Debug for TokenCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCoordinator")
			.field("token_set", &token::is_valid(self.store.read().as_ref()))
			.field("in_flight", &self.flight.lock().is_some())
			.finish()
	}
}

enum Role {
	Ready,
	Leader(FlightLease),
	Follower(Flight),
}

/// Held by the leader for the duration of a fetch; dropping it clears the slot before the
/// flight is released.
struct FlightLease {
	slot: FlightSlot,
	flight: Flight,
	_held: MutexGuardArc<()>,
}
impl Drop for FlightLease {
	fn drop(&mut self) {
		let mut slot = self.slot.lock();

		if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &self.flight)) {
			slot.take();
		}
	}
}
