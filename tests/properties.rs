use fuzzy_mamdani::credit;
use fuzzy_mamdani::{
    Condition, Consequence, Engine, FuzzyError, Inputs, LinguisticVariable, MembershipFunction, Rule, Universe,
};
use proptest::prelude::*;

fn triangle() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0..100.0f64, 0.1..50.0f64, 0.1..50.0f64).prop_map(|(a, left, right)| (a, a + left, a + left + right))
}

fn high(min: f64, max: f64, step: f64, name: &str, consequent: bool) -> LinguisticVariable {
    let universe = Universe::new(min, max, step).unwrap();
    let var = if consequent {
        LinguisticVariable::consequent(name, universe)
    } else {
        LinguisticVariable::antecedent(name, universe)
    };

    var.with_term("high", MembershipFunction::triangular(min, max, max).unwrap())
        .unwrap()
}

/// `IF x is high THEN y is high`
fn single_rule() -> Engine {
    Engine::builder()
        .variable(high(0., 10., 1., "x", false))
        .variable(high(0., 100., 1., "y", true))
        .rule(Rule::new(Condition::is("x", "high"), Consequence::new("y", "high")))
        .build()
        .unwrap()
}

fn two_inputs() -> Engine {
    Engine::builder()
        .variable(high(0., 10., 1., "x", false))
        .variable(high(0., 10., 1., "z", false))
        .variable(high(0., 100., 1., "y", true))
        .rule(Rule::new(
            Condition::is("x", "high").and(Condition::is("z", "high")),
            Consequence::new("y", "high"),
        ))
        .rule(Rule::new(
            Condition::is("x", "high").or(Condition::is("z", "high")),
            Consequence::new("y", "high"),
        ))
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn triangle_hits_its_breakpoints((a, b, c) in triangle()) {
        let mf = MembershipFunction::triangular(a, b, c).unwrap();

        prop_assert_eq!(mf.degree(a), 0.);
        prop_assert_eq!(mf.degree(b), 1.);
        prop_assert_eq!(mf.degree(c), 0.);
        prop_assert_eq!(mf.degree(a - 1.), 0.);
        prop_assert_eq!(mf.degree(c + 1.), 0.);
    }

    #[test]
    fn triangle_rises_then_falls((a, b, c) in triangle(), s in 0.0..1.0f64, t in 0.0..1.0f64) {
        let mf = MembershipFunction::triangular(a, b, c).unwrap();
        let (lo, hi) = if s <= t { (s, t) } else { (t, s) };

        prop_assert!(mf.degree(a + lo * (b - a)) <= mf.degree(a + hi * (b - a)) + 1e-9);
        prop_assert!(mf.degree(b + lo * (c - b)) + 1e-9 >= mf.degree(b + hi * (c - b)));
    }

    #[test]
    fn degree_is_always_a_unit_value((a, b, c) in triangle(), x in any::<f64>()) {
        let degree = MembershipFunction::triangular(a, b, c).unwrap().degree(x);

        prop_assert!(!degree.is_nan());
        prop_assert!((0. ..=1.).contains(&degree));
    }

    #[test]
    fn and_is_min_or_is_max(x in 0.0..=10.0f64, z in 0.0..=10.0f64) {
        let engine = two_inputs();
        let strengths = engine.firing_strengths(&Inputs::new().with("x", x).with("z", z)).unwrap();
        let mf = MembershipFunction::triangular(0., 10., 10.).unwrap();
        let (dx, dz) = (mf.degree(x), mf.degree(z));

        prop_assert_eq!(strengths, vec![f64::min(dx, dz), f64::max(dx, dz)]);
    }

    #[test]
    fn evaluate_is_idempotent(
        status in 0.0..=10.0f64,
        lama in 0.0..=10.0f64,
        gaji in 0.0..=20.0f64,
        riwayat in 0.0..=10.0f64,
        dbr in 0.0..=120.0f64,
    ) {
        let engine = credit::guarded_engine().unwrap();
        let inputs = Inputs::new()
            .with("status", status)
            .with("lama", lama)
            .with("gaji", gaji)
            .with("riwayat", riwayat)
            .with("dbr", dbr);
        let first = engine.compute(&inputs).map(|o| o.get("kelayakan"));
        let second = engine.compute(&inputs).map(|o| o.get("kelayakan"));

        prop_assert_eq!(first, second);
    }

    #[test]
    fn more_input_never_lowers_output(s in 0.5..=10.0f64, t in 0.5..=10.0f64) {
        let engine = single_rule();
        let (lo, hi) = if s <= t { (s, t) } else { (t, s) };
        let y_lo = engine.compute(&Inputs::new().with("x", lo)).unwrap().get("y").unwrap();
        let y_hi = engine.compute(&Inputs::new().with("x", hi)).unwrap().get("y").unwrap();

        prop_assert!(y_lo <= y_hi + 1e-9, "{} > {}", y_lo, y_hi);
    }

    #[test]
    fn zero_strength_everywhere_is_no_rule_fired(x in -5.0..=0.0f64) {
        let engine = single_rule();

        prop_assert_eq!(
            engine.compute(&Inputs::new().with("x", x)).unwrap_err(),
            FuzzyError::NoRuleFired("y".into())
        );
    }
}
