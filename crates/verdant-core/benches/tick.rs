//! Tick-pass throughput over a fully planted greenhouse.

use criterion::{criterion_group, criterion_main, Criterion};
use verdant_core::prelude::*;

fn bench_tick_pass(c: &mut Criterion) {
    let book = SpeciesBook::builtin();
    let species: Vec<_> = book.iter().cloned().collect();

    let mut greenhouse = Greenhouse::new();
    for plot in 0..greenhouse.capacity() {
        let plant = Plant::from_species(&species[plot % species.len()]);
        let _ = greenhouse.add_plant(plant, plot);
    }

    c.bench_function("tick_full_greenhouse", |b| {
        b.iter(|| greenhouse.tick_all_plants());
    });
}

criterion_group!(benches, bench_tick_pass);
criterion_main!(benches);
