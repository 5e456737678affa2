// Criterion benchmarks for DineFine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dinefine::core::{build_search_params, classify_query, normalize_results};
use dinefine::models::{
    Coordinates, PriceLevel, RawCategory, RawHours, RawLocation, RawOpenPeriod, RawRestaurant,
    RawScalar, UserPreferences,
};

fn create_raw_record(id: usize) -> RawRestaurant {
    RawRestaurant {
        id: Some(format!("bench-{}", id)),
        name: Some(format!("Restaurant {}", id)),
        image_url: None,
        categories: vec![RawCategory { title: Some("Thai".to_string()) }],
        rating: Some(3.0 + (id % 20) as f64 / 10.0),
        price: Some(if id % 2 == 0 {
            RawScalar::Text("$$".to_string())
        } else {
            RawScalar::Number((id % 4 + 1) as f64)
        }),
        location: Some(RawLocation { address1: Some(format!("{} Market St", id)) }),
        distance: if id % 7 == 0 { None } else { Some(250.0 * (id % 12) as f64) },
        phone: None,
        url: None,
        hours: vec![RawHours {
            open: (0..7)
                .map(|day| RawOpenPeriod {
                    day: RawScalar::Number(day as f64),
                    start: "1100".to_string(),
                    end: "2200".to_string(),
                })
                .collect(),
        }],
        coordinates: None,
    }
}

fn bench_classify_query(c: &mut Criterion) {
    let queries = [
        "pizza",
        "cheap vegan thai near me, no peanuts",
        "I want a luxury gluten free tasting menu with no shellfish and a dairy allergy",
    ];

    let mut group = c.benchmark_group("classify_query");
    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query.len()), &query, |b, query| {
            b.iter(|| classify_query(black_box(query)));
        });
    }
    group.finish();
}

fn bench_search_params(c: &mut Criterion) {
    let preferences = UserPreferences {
        coordinates: Some(Coordinates { lat: 37.7749, lng: -122.4194 }),
        cuisine_type: Some("Japanese".to_string()),
        price_range: Some(PriceLevel::Expensive),
        dietary_restrictions: vec!["Vegetarian".to_string(), "Gluten-Free".to_string()],
        ..Default::default()
    };

    c.bench_function("build_search_params", |b| {
        b.iter(|| build_search_params(black_box(&preferences)).to_query_string());
    });
}

fn bench_normalize_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_results");

    for size in [5, 50, 500].iter() {
        let records: Vec<RawRestaurant> = (0..*size).map(create_raw_record).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| normalize_results(black_box(records.clone())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classify_query,
    bench_search_params,
    bench_normalize_results
);
criterion_main!(benches);
