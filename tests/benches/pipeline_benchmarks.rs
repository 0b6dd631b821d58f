//! # vpurse Pipeline Benchmarks
//!
//! | Stage | Input | Target |
//! |-------|-------|--------|
//! | collect | 1000 transfers over 200 accounts | < 10ms |
//! | encode | 200 accounts, 3 denoms each | < 1ms |
//! | end_block | 1000 transfers, channel bridge | < 20ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use primitive_types::U256;
use shared_types::{AccAddress, BlockContext, Event};
use std::sync::Arc;
use std::time::Duration;
use vpurse::{
    encode_balance_update, AddressCodec, AppModule, Bech32AddressCodec, ChannelControllerBridge,
    InMemoryBankKeeper, MockControllerBridge, VpurseModule,
};

const ACCOUNTS: u8 = 200;

fn account(index: u8) -> AccAddress {
    let mut bytes = [0u8; 20];
    bytes[0] = index;
    bytes[19] = 0x5a;
    AccAddress::from_bytes(bytes).unwrap()
}

fn funded_keeper(codec: &Bech32AddressCodec) -> (InMemoryBankKeeper, Vec<String>) {
    let keeper = InMemoryBankKeeper::new();
    let mut addresses = Vec::with_capacity(ACCOUNTS as usize);
    for i in 0..ACCOUNTS {
        for denom in ["ubld", "urun", "uist"] {
            keeper
                .set_balance(&account(i), denom, U256::from(1_000_000u64 + i as u64))
                .unwrap();
        }
        addresses.push(codec.encode(&account(i)).unwrap());
    }
    (keeper, addresses)
}

fn transfer_block(addresses: &[String], transfers: usize) -> BlockContext {
    let mut ctx = BlockContext::at_height("agoric-3", 1);
    for n in 0..transfers {
        let from = &addresses[n % addresses.len()];
        let to = &addresses[(n * 7 + 3) % addresses.len()];
        ctx.event_manager_mut()
            .emit(Event::transfer(from, to, "1ubld"));
    }
    ctx
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("vpurse-collect");
    group.measurement_time(Duration::from_secs(5));

    let codec = Bech32AddressCodec::new("agoric").unwrap();
    let (keeper, addresses) = funded_keeper(&codec);
    let module = VpurseModule::new(
        Arc::new(keeper),
        Arc::new(MockControllerBridge::new()),
        codec,
    );

    for transfers in [10usize, 100, 1000] {
        let ctx = transfer_block(&addresses, transfers);
        group.throughput(Throughput::Elements(transfers as u64));
        group.bench_with_input(
            BenchmarkId::new("collect_balance_updates", transfers),
            &ctx,
            |b, ctx| b.iter(|| black_box(module.collect_balance_updates(ctx))),
        );
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let codec = Bech32AddressCodec::new("agoric").unwrap();
    let (keeper, addresses) = funded_keeper(&codec);
    let module = VpurseModule::new(
        Arc::new(keeper),
        Arc::new(MockControllerBridge::new()),
        codec,
    );
    let (pending, _) = module.collect_balance_updates(&transfer_block(&addresses, 1000));

    c.bench_function("vpurse-encode/200_accounts", |b| {
        b.iter(|| black_box(encode_balance_update(&pending).unwrap()))
    });
}

fn bench_end_block(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let codec = Bech32AddressCodec::new("agoric").unwrap();
    let (keeper, addresses) = funded_keeper(&codec);

    let (bridge, mut rx) = ChannelControllerBridge::channel(16);
    runtime.spawn(async move {
        while let Some(request) = rx.recv().await {
            request.acknowledge(b"true".to_vec());
        }
    });
    let module = VpurseModule::new(Arc::new(keeper), Arc::new(bridge), codec);
    let ctx = transfer_block(&addresses, 1000);

    c.bench_function("vpurse-end_block/1000_transfers", |b| {
        b.iter(|| runtime.block_on(module.end_block(&ctx)).unwrap())
    });
}

criterion_group!(benches, bench_collect, bench_encode, bench_end_block);
criterion_main!(benches);
