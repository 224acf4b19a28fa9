use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use std::hint::black_box;

use flostats::common_opponents::find_common_opponents;
use flostats::head_to_head::find_head_to_head;
use flostats::model::{Bout, BoutsResponse, CompoundResponse, Page, PersonIdentityId};
use flostats::summary::summarize;

const OPPONENTS: usize = 400;
const BOUTS: usize = 1_500;

fn wrestler(record: &str, person: &str) -> Value {
    json!({
        "id": record,
        "type": "wrestler",
        "attributes": {
            "identityPersonId": person,
            "firstName": "First",
            "lastName": person,
            "divisionId": "d1"
        }
    })
}

/// A long career against a pool of opponents, with one season record per
/// opponent appearance so identity resolution has real work to do.
fn synthetic_history(athlete: &str, rival: &str, seed: u64) -> BoutsResponse {
    let mut rng = StdRng::seed_from_u64(seed);
    let me = format!("{athlete}-rec");
    let mut data = Vec::with_capacity(BOUTS);
    let mut included = vec![wrestler(&me, athlete), wrestler(&format!("{rival}-rec"), rival)];

    for i in 0..BOUTS {
        let opponent = if rng.gen_range(0..50) == 0 {
            format!("{rival}-rec")
        } else {
            let person = format!("opp-{}", rng.gen_range(0..OPPONENTS));
            let record = format!("{person}-s{}-{seed}", rng.gen_range(0..4));
            included.push(wrestler(&record, &person));
            record
        };
        let (top, bottom) = if rng.gen_bool(0.5) {
            (me.as_str(), opponent.as_str())
        } else {
            (opponent.as_str(), me.as_str())
        };
        let winner = if rng.gen_bool(0.6) { me.as_str() } else { opponent.as_str() };
        data.push(json!({
            "id": format!("{athlete}-b{i}"),
            "type": "bout",
            "attributes": {
                "topWrestlerId": top,
                "bottomWrestlerId": bottom,
                "winnerWrestlerId": winner,
                "winType": "DEC",
                "goDateTime": format!("2024-01-{:02}T12:00:00Z", rng.gen_range(1..29))
            }
        }));
    }

    let body = json!({"data": data, "included": included, "meta": {"total": BOUTS}});
    let page: Page<Bout> = serde_json::from_value(body).expect("synthetic page is well formed");
    CompoundResponse::from(page)
}

fn bench_common_opponents(c: &mut Criterion) {
    let a = PersonIdentityId::from("athlete-a");
    let b = PersonIdentityId::from("athlete-b");
    let first = synthetic_history("athlete-a", "athlete-b", 7);
    let second = synthetic_history("athlete-b", "athlete-a", 11);

    c.bench_function("common_opponents", |bench| {
        bench.iter(|| {
            let common = find_common_opponents(black_box(&first), black_box(&second), &a, &b);
            black_box(common.len());
        })
    });

    let common = find_common_opponents(&first, &second, &a, &b);
    c.bench_function("common_opponents_summary", |bench| {
        bench.iter(|| black_box(summarize(black_box(&common))))
    });
}

fn bench_head_to_head(c: &mut Criterion) {
    let a = PersonIdentityId::from("athlete-a");
    let b = PersonIdentityId::from("athlete-b");
    let first = synthetic_history("athlete-a", "athlete-b", 7);

    c.bench_function("head_to_head", |bench| {
        bench.iter(|| {
            let matches = find_head_to_head(black_box(&first), &a, &b);
            black_box(matches.len());
        })
    });
}

criterion_group!(perf, bench_common_opponents, bench_head_to_head);
criterion_main!(perf);
