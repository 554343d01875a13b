// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// self
use csrf_singleflight::{
	coordinator::TokenCoordinator,
	error::{Error, FetchError},
	fetch::{TokenFetcher, fetch_fn},
	store::{MemoryStore, TokenStore},
	token::CsrfToken,
};

fn coordinator() -> (TokenCoordinator, MemoryStore) {
	let store = MemoryStore::default();
	let shared: Arc<dyn TokenStore> = Arc::new(store.clone());

	(TokenCoordinator::new(shared), store)
}

fn delayed_fetcher(
	value: &'static str,
	delay: Duration,
) -> (impl TokenFetcher + 'static, Arc<AtomicUsize>) {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let fetcher = fetch_fn(move || {
		counter.fetch_add(1, Ordering::SeqCst);

		async move {
			tokio::time::sleep(delay).await;

			Ok::<_, FetchError>(CsrfToken::new(value))
		}
	});

	(fetcher, calls)
}

fn exposed(store: &MemoryStore) -> Option<String> {
	store.read().map(|token| token.expose().to_owned())
}

#[tokio::test]
async fn concurrent_callers_share_a_single_fetch() {
	let (coordinator, store) = coordinator();
	let (fetcher, calls) = delayed_fetcher("tok-1", Duration::from_millis(50));
	let (a, b, c) = tokio::join!(
		coordinator.ensure_token(&fetcher),
		coordinator.ensure_token(&fetcher),
		coordinator.ensure_token(&fetcher),
	);

	a.expect("First consumer should resolve.");
	b.expect("Second consumer should resolve.");
	c.expect("Third consumer should resolve.");

	assert_eq!(exposed(&store), Some("tok-1".into()));
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(coordinator.metrics().attempts(), 3);
	assert_eq!(coordinator.metrics().waits(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_callers_across_threads_fetch_once() {
	let (coordinator, store) = coordinator();
	let (fetcher, calls) = delayed_fetcher("tok-threads", Duration::from_millis(50));
	let fetcher = Arc::new(fetcher);
	let tasks = (0..16)
		.map(|_| {
			let coordinator = coordinator.clone();
			let fetcher = fetcher.clone();

			tokio::spawn(async move { coordinator.ensure_token(fetcher.as_ref()).await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		task.await
			.expect("Acquisition task should not panic.")
			.expect("Acquisition task should succeed.");
	}

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(exposed(&store), Some("tok-threads".into()));
}

#[tokio::test]
async fn valid_tokens_skip_the_fetcher() {
	let store = MemoryStore::seeded("tok-2");
	let coordinator = TokenCoordinator::new(Arc::new(store.clone()));
	let fetcher = fetch_fn(|| -> std::future::Ready<Result<CsrfToken, FetchError>> {
		panic!("The fetcher must not run while the store holds a valid token.")
	});
	let (a, b) =
		tokio::join!(coordinator.ensure_token(&fetcher), coordinator.ensure_token(&fetcher));

	a.expect("Cached token should satisfy the first caller.");
	b.expect("Cached token should satisfy the second caller.");

	assert_eq!(exposed(&store), Some("tok-2".into()));
	assert_eq!(coordinator.metrics().fetches(), 0);
	assert_eq!(coordinator.metrics().reuses(), 2);
}

#[tokio::test]
async fn repeated_calls_reuse_until_invalidated() {
	let (coordinator, store) = coordinator();
	let (fetcher, calls) = delayed_fetcher("tok-cycle", Duration::ZERO);

	for _ in 0..5 {
		coordinator.ensure_token(&fetcher).await.expect("Acquisition should succeed.");
	}

	assert_eq!(calls.load(Ordering::SeqCst), 1);

	coordinator.invalidate();

	assert!(store.read().is_none());

	coordinator
		.ensure_token(&fetcher)
		.await
		.expect("Acquisition after invalidation should succeed.");

	assert_eq!(calls.load(Ordering::SeqCst), 2);

	store.write(CsrfToken::new(""));
	coordinator
		.ensure_token(&fetcher)
		.await
		.expect("Acquisition after an empty write should succeed.");

	assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rejected_fetch_leaves_store_unset_and_allows_a_later_success() {
	let (coordinator, store) = coordinator();
	let failing = fetch_fn(|| async {
		Err::<CsrfToken, _>(FetchError::rejected("network unreachable"))
	});
	let err = coordinator
		.ensure_token(&failing)
		.await
		.expect_err("The initiating caller should receive the fetch failure.");

	assert!(matches!(err, Error::FetchFailed(FetchError::Rejected { .. })));
	assert!(store.read().is_none());

	let (succeeding, calls) = delayed_fetcher("tok-recovered", Duration::ZERO);

	coordinator.ensure_token(&succeeding).await.expect("A later acquisition should succeed.");

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(exposed(&store), Some("tok-recovered".into()));
	assert_eq!(coordinator.metrics().failures(), 1);
}

#[tokio::test]
async fn waiters_resolve_only_after_the_flight_settles() {
	let (coordinator, store) = coordinator();
	let (fetcher, _calls) = delayed_fetcher("tok-order", Duration::from_millis(30));
	let observed = Arc::new(parking_lot::Mutex::new(Vec::new()));
	let observe = |label: &'static str| {
		let coordinator = coordinator.clone();
		let observed = observed.clone();
		let fetcher = &fetcher;

		async move {
			coordinator.ensure_token(fetcher).await.expect("Acquisition should succeed.");
			let token = coordinator.read().map(|token| token.expose().to_owned());

			observed.lock().push((label, token));
		}
	};

	tokio::join!(observe("a"), observe("b"), observe("c"));

	let observed = observed.lock();

	assert_eq!(observed.len(), 3);
	assert!(observed.iter().all(|(_, token)| token.as_deref() == Some("tok-order")));
	assert_eq!(exposed(&store), Some("tok-order".into()));
}

struct SlowRead(MemoryStore);
impl TokenStore for SlowRead {
	fn read(&self) -> Option<CsrfToken> {
		std::thread::sleep(Duration::from_millis(2));

		self.0.read()
	}

	fn write(&self, token: CsrfToken) {
		self.0.write(token);
	}

	fn invalidate(&self) {
		self.0.invalidate();
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn slow_store_reads_never_trigger_a_second_fetch() {
	let coordinator = TokenCoordinator::new(Arc::new(SlowRead(MemoryStore::default())));
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let fetcher = Arc::new(fetch_fn(move || {
		counter.fetch_add(1, Ordering::SeqCst);

		async { Ok::<_, FetchError>(CsrfToken::new("tok-slow")) }
	}));

	for cycle in 1..=50 {
		let tasks = (0..8)
			.map(|_| {
				let coordinator = coordinator.clone();
				let fetcher = fetcher.clone();

				tokio::spawn(async move { coordinator.ensure_token(fetcher.as_ref()).await })
			})
			.collect::<Vec<_>>();

		for task in tasks {
			task.await
				.expect("Acquisition task should not panic.")
				.expect("Acquisition task should succeed.");
		}

		assert_eq!(calls.load(Ordering::SeqCst), cycle, "each cycle should fetch exactly once");

		coordinator.invalidate();
	}
}
