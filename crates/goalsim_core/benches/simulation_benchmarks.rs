//! Criterion benchmarks for goalsim_core
//!
//! Run with: cargo bench -p goalsim_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use goalsim_core::{
    Goal, GoalSolver, SensitivityAnalyzer, SimulationEngine, SimulationParameters, SolverConfig,
    SweepConfig,
};

fn scenario(iterations: usize) -> SimulationParameters {
    SimulationParameters {
        initial_portfolio_value: 500_000.0,
        monthly_contribution: 2_083.0,
        time_horizon_years: 10,
        expected_return: 0.08,
        volatility: 0.15,
        goal_amount: 2_000_000.0,
        iterations,
        seed: Some(42),
        ..Default::default()
    }
}

fn goal() -> Goal {
    Goal {
        current_amount: 50_000.0,
        target_amount: 100_000.0,
        years_to_goal: 5,
        monthly_contribution: 500.0,
        expected_return: 0.07,
        volatility: 0.15,
        ..Default::default()
    }
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    let engine = SimulationEngine::default();

    for iterations in [1_000, 5_000, 20_000].iter() {
        let params = scenario(*iterations);
        group.bench_with_input(
            BenchmarkId::new("iterations", iterations),
            iterations,
            |b, _| b.iter(|| engine.run(black_box(&params))),
        );
    }

    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    let solver = GoalSolver::new(
        SimulationEngine::default(),
        SolverConfig {
            seed: Some(42),
            ..Default::default()
        },
    );
    let goal = goal();

    c.bench_function("solve_contribution", |b| {
        b.iter(|| solver.solve_contribution(black_box(&goal), 0.8, 0.02, 50))
    });
}

fn bench_sweeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitivity");
    let analyzer = SensitivityAnalyzer::new(
        SimulationEngine::default(),
        SweepConfig {
            seed: Some(42),
            ..Default::default()
        },
    );
    let goal = goal();
    let variables = ["monthly_contribution", "expected_return", "volatility"];

    group.bench_function("one_way", |b| {
        b.iter(|| analyzer.one_way_sensitivity(black_box(&goal), &variables, 20.0, 5, 1_000))
    });
    group.bench_function("two_way", |b| {
        b.iter(|| {
            analyzer.two_way_sensitivity(
                black_box(&goal),
                "monthly_contribution",
                "years_to_goal",
                25.0,
                5,
                1_000,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_monte_carlo, bench_solver, bench_sweeps);
criterion_main!(benches);
