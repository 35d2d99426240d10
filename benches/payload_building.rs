//! Benchmarks for payload building
//!
//! This benchmark measures:
//! - Intent to wire payload conversion for each message kind
//! - JSON serialization of the built payloads
//! - Batch body construction for large reachability lookups

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rbm_lib_rust::payload::{build_event, build_message, MediaHeight};
use rbm_lib_rust::services::batch_get_users_call;
use rbm_lib_rust::{
    CardContent, CardWidth, CarouselRichCard, EventIntent, MessageIntent, Msisdn,
    StandaloneRichCard, Suggestion, TextMessage,
};

fn create_text() -> MessageIntent {
    TextMessage::new("Your order has shipped!")
        .with_suggestions(vec![
            Suggestion::reply("Track", "track_order"),
            Suggestion::open_url("Details", "details", "https://example.com/orders/42"),
        ])
        .into()
}

fn create_standalone_card() -> MessageIntent {
    StandaloneRichCard::new("https://example.com/img/boots.png")
        .with_title("Hiking boots")
        .with_description("Waterproof, sizes 36-47")
        .with_suggestions(vec![Suggestion::reply("Buy", "buy_boots")])
        .into()
}

fn create_carousel(cards: usize) -> MessageIntent {
    let mut carousel = CarouselRichCard::new(Vec::new()).with_card_width(CardWidth::Small);
    for i in 0..cards {
        carousel = carousel.push_card(
            CardContent::new()
                .with_title(format!("Item {}", i))
                .with_description("In stock")
                .with_media(format!("https://example.com/img/{}.png", i), MediaHeight::Medium)
                .with_suggestions(vec![Suggestion::reply("Select", format!("item_{}", i))]),
        );
    }
    carousel.into()
}

fn bench_message_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_building");

    let cases = vec![
        ("text", create_text()),
        ("standalone_card", create_standalone_card()),
        ("carousel_10", create_carousel(10)),
    ];

    for (name, intent) in &cases {
        group.bench_with_input(BenchmarkId::new("build", name), intent, |b, intent| {
            b.iter(|| build_message(black_box(intent)))
        });
        group.bench_with_input(
            BenchmarkId::new("build_and_serialize", name),
            intent,
            |b, intent| b.iter(|| serde_json::to_vec(&build_message(black_box(intent))).unwrap()),
        );
    }

    group.finish();
}

fn bench_event_building(c: &mut Criterion) {
    let read = EventIntent::read("MxAbCdEf0123456789");
    c.bench_function("event_building/read", |b| {
        b.iter(|| serde_json::to_value(build_event(black_box(&read))).unwrap())
    });
}

fn bench_batch_users(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_users");

    for size in [100usize, 1_000, 10_000] {
        let numbers: Vec<Msisdn> = (0..size)
            .map(|i| Msisdn::new(format!("+1555{:07}", i)))
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &numbers, |b, numbers| {
            b.iter(|| batch_get_users_call(black_box(numbers)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_message_building,
    bench_event_building,
    bench_batch_users
);
criterion_main!(benches);
