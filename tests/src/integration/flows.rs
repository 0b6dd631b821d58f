//! # Integration Test Flows
//!
//! Drives `VpurseModule::end_block` over several blocks with bech32 accounts,
//! an in-memory bank and a controller task that keeps its own mirror of
//! balances from the delivered updates.
//!
//! ## Flow Tested:
//!
//! 1. **Bank → Events**: `InMemoryBankKeeper::send` emits transfer events
//! 2. **vpurse → Controller**: one update per block over the channel bridge
//! 3. **Controller mirror**: stays equal to the ledger for every touched account

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use primitive_types::U256;
    use shared_types::{AccAddress, BlockContext, Coins, Event, RawAttribute, RawEvent};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use vpurse::{
        decode_balance_update, AddressCodec, AppModule, BankKeeper, Bech32AddressCodec,
        ChannelControllerBridge, ControllerBridge, ControllerError, ControllerRequest,
        DeliveryPayload, InMemoryBankKeeper, VpurseConfig, VpurseError, VpurseModule,
    };
    use vpurse_telemetry::{init_logging, TelemetryConfig};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Mirror = Arc<Mutex<BTreeMap<String, Coins>>>;

    fn init_test_logging() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
            console_output: false,
            ..TelemetryConfig::default()
        };
        // Another test may have installed the subscriber already.
        let _ = init_logging(&config);
    }

    fn account(byte: u8) -> AccAddress {
        AccAddress::from_bytes([byte; 20]).unwrap()
    }

    fn agoric() -> Bech32AddressCodec {
        Bech32AddressCodec::new("agoric").unwrap()
    }

    fn bech32(byte: u8) -> String {
        agoric().encode(&account(byte)).unwrap()
    }

    /// Controller that applies every update to its mirror and acknowledges.
    /// Resolves to the number of requests served once the bridge is dropped.
    fn spawn_mirroring_controller(
        mut rx: mpsc::Receiver<ControllerRequest>,
        mirror: Mirror,
    ) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut served = 0;
            while let Some(request) = rx.recv().await {
                served += 1;
                match decode_balance_update(request.payload.as_bytes()) {
                    Ok(update) => {
                        mirror.lock().extend(update);
                        request.acknowledge(b"true".to_vec());
                    }
                    Err(err) => request.reject(err.to_string()),
                }
            }
            served
        })
    }

    fn new_module(
        keeper: Arc<InMemoryBankKeeper>,
        bridge: ChannelControllerBridge,
    ) -> VpurseModule<InMemoryBankKeeper, ChannelControllerBridge> {
        VpurseModule::from_config(&VpurseConfig::default(), keeper, Arc::new(bridge)).unwrap()
    }

    fn send(
        keeper: &InMemoryBankKeeper,
        ctx: &mut BlockContext,
        from: u8,
        to: u8,
        denom: &str,
        amount: u64,
    ) {
        keeper
            .send(ctx, &agoric(), &account(from), &account(to), denom, U256::from(amount))
            .unwrap();
    }

    fn assert_mirror_matches_ledger(
        mirror: &Mirror,
        keeper: &InMemoryBankKeeper,
        accounts: &[u8],
    ) {
        let ctx = BlockContext::default();
        let mirror = mirror.lock();
        for byte in accounts {
            let ledger = keeper.get_all_balances(&ctx, &account(*byte));
            assert_eq!(
                mirror.get(&bech32(*byte)),
                Some(&ledger),
                "mirror diverged for account {byte:#x}"
            );
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: MULTI-BLOCK MIRRORING
    // =============================================================================

    /// Balances seen by the controller track the ledger block after block.
    #[tokio::test]
    async fn test_controller_mirror_tracks_ledger() {
        init_test_logging();
        let keeper = Arc::new(InMemoryBankKeeper::new());
        for byte in [1u8, 2, 3] {
            keeper.set_balance(&account(byte), "ubld", U256::from(1_000u64)).unwrap();
        }
        keeper.set_balance(&account(1), "urun", U256::from(50u64)).unwrap();

        let (bridge, rx) = ChannelControllerBridge::channel(4);
        let mirror = Mirror::default();
        let controller = spawn_mirroring_controller(rx, mirror.clone());
        let module = new_module(keeper.clone(), bridge);

        // Block 1: 1 → 2
        let mut ctx = BlockContext::at_height("agoric-3", 1);
        send(&keeper, &mut ctx, 1, 2, "ubld", 100);
        module.end_block(&ctx).await.unwrap();
        assert_mirror_matches_ledger(&mirror, &keeper, &[1, 2]);
        assert!(!mirror.lock().contains_key(&bech32(3)));

        // Block 2: 2 → 3, 3 → 1 in two denoms
        let mut ctx = BlockContext::at_height("agoric-3", 2);
        send(&keeper, &mut ctx, 2, 3, "ubld", 600);
        send(&keeper, &mut ctx, 1, 3, "urun", 50);
        module.end_block(&ctx).await.unwrap();
        assert_mirror_matches_ledger(&mirror, &keeper, &[1, 2, 3]);

        // Account 1 spent all of its urun; the mirror must drop the denom too.
        assert_eq!(
            mirror.lock()[&bech32(1)].amount_of("urun"),
            U256::zero()
        );

        // Block 3: nothing happens
        let ctx = BlockContext::at_height("agoric-3", 3);
        module.end_block(&ctx).await.unwrap();

        drop(module);
        assert_eq!(controller.await.unwrap(), 2);
    }

    /// Each update carries only the accounts touched in its block.
    #[tokio::test]
    async fn test_update_limited_to_block_parties() {
        init_test_logging();
        let keeper = Arc::new(InMemoryBankKeeper::new());
        keeper.set_balance(&account(1), "ubld", U256::from(10u64)).unwrap();
        keeper.set_balance(&account(9), "ubld", U256::from(99u64)).unwrap();

        let (bridge, mut rx) = ChannelControllerBridge::channel(1);
        let module = new_module(keeper.clone(), bridge);

        let mut ctx = BlockContext::at_height("agoric-3", 10);
        send(&keeper, &mut ctx, 1, 2, "ubld", 4);

        let (result, request) = tokio::join!(module.end_block(&ctx), async {
            let request = rx.recv().await.unwrap();
            let update = decode_balance_update(request.payload.as_bytes()).unwrap();
            request.acknowledge(Vec::new());
            update
        });
        result.unwrap();

        let keys: Vec<String> = request.keys().cloned().collect();
        let mut expected = vec![bech32(1), bech32(2)];
        expected.sort();
        assert_eq!(keys, expected);
    }

    /// Upper-case and lower-case spellings of one account share an entry.
    #[tokio::test]
    async fn test_mixed_case_spellings_collapse() {
        let keeper = Arc::new(InMemoryBankKeeper::new());
        keeper.set_balance(&account(5), "ubld", U256::from(5u64)).unwrap();

        let (bridge, mut rx) = ChannelControllerBridge::channel(1);
        let module = new_module(keeper.clone(), bridge);

        let mut ctx = BlockContext::at_height("agoric-3", 11);
        ctx.event_manager_mut().emit_raw(RawEvent {
            ty: "transfer".to_string(),
            attributes: vec![
                RawAttribute::new("recipient", bech32(5).to_uppercase()),
                RawAttribute::new("sender", bech32(5)),
                RawAttribute::new("amount", "1ubld"),
            ],
        });

        let (result, request) = tokio::join!(module.end_block(&ctx), async {
            let request = rx.recv().await.unwrap();
            let update = decode_balance_update(request.payload.as_bytes()).unwrap();
            request.acknowledge(Vec::new());
            update
        });
        result.unwrap();

        assert_eq!(request.len(), 1);
        assert_eq!(keeper.query_count(&account(5)), 1);
    }

    /// Addresses from another chain are skipped; the rest still ships.
    #[tokio::test]
    async fn test_foreign_prefix_skipped() {
        init_test_logging();
        let keeper = Arc::new(InMemoryBankKeeper::new());
        let cosmos = Bech32AddressCodec::new("cosmos").unwrap();

        let (bridge, rx) = ChannelControllerBridge::channel(1);
        let mirror = Mirror::default();
        let controller = spawn_mirroring_controller(rx, mirror.clone());
        let module = new_module(keeper.clone(), bridge);

        let mut ctx = BlockContext::at_height("agoric-3", 12);
        ctx.event_manager_mut().emit(Event::transfer(
            &cosmos.encode(&account(7)).unwrap(),
            &bech32(8),
            "1ubld",
        ));
        module.end_block(&ctx).await.unwrap();

        drop(module);
        assert_eq!(controller.await.unwrap(), 1);
        let mirror = mirror.lock();
        assert_eq!(mirror.len(), 1);
        assert!(mirror.contains_key(&bech32(8)));
        assert_eq!(keeper.query_count(&account(7)), 0);
    }

    /// A block with transfers between unparseable strings costs no round trip.
    #[tokio::test]
    async fn test_no_deliverable_addresses_no_request() {
        let keeper = Arc::new(InMemoryBankKeeper::new());
        let (bridge, mut rx) = ChannelControllerBridge::channel(1);
        let module = new_module(keeper, bridge);

        let mut ctx = BlockContext::at_height("agoric-3", 13);
        ctx.event_manager_mut()
            .emit(Event::transfer("alice", "bob", "1ubld"));
        module.end_block(&ctx).await.unwrap();

        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Empty)
        ));
    }

    // =============================================================================
    // INTEGRATION TESTS: FATAL DELIVERY
    // =============================================================================

    #[tokio::test]
    async fn test_controller_rejection_halts_block() {
        init_test_logging();
        let keeper = Arc::new(InMemoryBankKeeper::new());
        keeper.set_balance(&account(1), "ubld", U256::from(10u64)).unwrap();

        let (bridge, mut rx) = ChannelControllerBridge::channel(1);
        let module = new_module(keeper.clone(), bridge);
        let controller = tokio::spawn(async move {
            let mut served = 0;
            while let Some(request) = rx.recv().await {
                served += 1;
                request.reject("mirror out of sync");
            }
            served
        });

        let mut ctx = BlockContext::at_height("agoric-3", 20);
        send(&keeper, &mut ctx, 1, 2, "ubld", 1);

        let err = module.end_block(&ctx).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            VpurseError::Delivery {
                block_height: 20,
                source: ControllerError::Rejected(_)
            }
        ));

        drop(module);
        assert_eq!(controller.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_controller_gone_is_fatal() {
        let keeper = Arc::new(InMemoryBankKeeper::new());
        keeper.set_balance(&account(1), "ubld", U256::from(10u64)).unwrap();

        let (bridge, rx) = ChannelControllerBridge::channel(1);
        drop(rx);
        let module = new_module(keeper.clone(), bridge);

        let mut ctx = BlockContext::at_height("agoric-3", 21);
        send(&keeper, &mut ctx, 1, 2, "ubld", 1);

        let err = module.end_block(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            VpurseError::Delivery {
                source: ControllerError::ChannelClosed,
                ..
            }
        ));
    }

    /// Bridge that fails every call and counts attempts.
    #[derive(Default)]
    struct FlakyBridge {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ControllerBridge for FlakyBridge {
        async fn call_to_controller(
            &self,
            _ctx: &BlockContext,
            _payload: &DeliveryPayload,
        ) -> Result<Vec<u8>, ControllerError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(ControllerError::NoReply)
        }
    }

    #[tokio::test]
    async fn test_failed_delivery_not_retried() {
        let keeper = Arc::new(InMemoryBankKeeper::new());
        keeper.set_balance(&account(1), "ubld", U256::from(10u64)).unwrap();
        let bridge = Arc::new(FlakyBridge::default());
        let module = VpurseModule::new(keeper.clone(), bridge.clone(), agoric());

        let mut ctx = BlockContext::at_height("agoric-3", 22);
        send(&keeper, &mut ctx, 1, 2, "ubld", 1);

        assert!(module.end_block(&ctx).await.is_err());
        assert_eq!(bridge.attempts.load(Ordering::SeqCst), 1);
    }
}
