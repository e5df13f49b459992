use approx::assert_relative_eq;
use arachne::{prelude::*, wav};
use std::rc::Rc;

fn env() -> Rc<Environment> {
    Environment::new(&Config::new().seed(11).build()).unwrap()
}

#[test]
fn stateful_kinds_repeat_an_index() {
    let env = env();
    let f = Factory::new(&env);
    let graphs = [
        "RandomUniform{minimum{-5}maximum{5}}",
        "Selector{valueList{1,2,3,4}selectionMethod{3}}",
        "FilterLowPass{operand1{WaveSquare{rate{8}{samples}}}rate{1000}{frequency}}",
        "FilterHighPass{operand1{Click{rate{5}{samples}}}}",
    ];
    for graph in graphs.iter() {
        let g = f.create(graph).unwrap();
        let mut g = g.borrow_mut();
        for i in 0..64 {
            let a = g.scalar(i);
            let b = g.scalar(i);
            let c = g.poly(i)[0];
            assert_eq!(a, b, "{} at {}", graph, i);
            assert_eq!(a, c, "{} at {}", graph, i);
        }
    }
}

#[test]
fn shared_child_evaluated_once_per_index() {
    let env = env();
    let r = Generator::shared(GeneratorKind::RandomUniform, &env);
    let mut add = Generator::new(GeneratorKind::Add, &env);
    add.set(ParameterName::Operand1, &r).unwrap();
    add.set(ParameterName::Operand2, &r).unwrap();
    for i in 0..32 {
        let sum = add.scalar(i);
        let v = r.borrow_mut().scalar(i);
        assert_relative_eq!(sum, 2.0 * v);
    }
}

#[test]
fn seeded_environments_agree() {
    let a = Factory::new(&env()).create("RandomUniform").unwrap();
    let b = Factory::new(&env()).create("RandomUniform").unwrap();
    assert_eq!(a.borrow_mut().render(16), b.borrow_mut().render(16));
}

#[test]
fn random_stays_in_range() {
    let env = env();
    let mut r = Generator::new(GeneratorKind::RandomUniform, &env);
    r.set(ParameterName::Minimum, 20.0).unwrap();
    r.set(ParameterName::Maximum, 30.0).unwrap();
    for v in r.render(500) {
        assert!((20.0..=30.0).contains(&v));
    }
}

#[test]
fn lowpass_settles_on_dc() {
    let env = env();
    let mut lp = Generator::new(GeneratorKind::FilterLowPass, &env);
    lp.set(ParameterName::Operand1, 1.0).unwrap();
    let out = lp.render(44100);
    assert_relative_eq!(out[44099], 1.0, epsilon = 1e-6);
    assert!(out[0] < out[1]);
}

#[test]
fn reset_graph_reaches_children() {
    let env = env();
    let f = Factory::new(&env);
    let g = f
        .create("Add{operand1{FilterLowPass{operand1{1}}}operand2{0}}")
        .unwrap();
    let first = g.borrow_mut().render(8);
    g.borrow_mut().reset_graph();
    let second = g.borrow_mut().render(8);
    assert_eq!(first, second);
}

#[test]
fn poly_add_and_pan() {
    let env = env();
    let f = Factory::new(&env);
    let g = f
        .create("PolyAdd{operand1{PolyConstant{1,2,3}}operand2{PanStereo{operand1{2}panLeftRight{0.5}}}}")
        .unwrap();
    let mut g = g.borrow_mut();
    assert_eq!(g.poly_depth(), 3);
    let frame = g.poly(0);
    let half = 2.0 * (0.5 as Real).sqrt();
    assert_relative_eq!(frame[0], 1.0 + half);
    assert_relative_eq!(frame[1], 2.0 + half);
    assert_relative_eq!(frame[2], 3.0);
}

#[test]
fn table_file_from_wav() {
    let path = std::env::temp_dir().join("arachne_table_file.wav");
    wav::write_table(&path, 2, 44100, &[0.5, -0.5, 0.25, -0.25]).unwrap();

    let env = env();
    let f = Factory::new(&env);
    let text = format!("PolyTableFile{{{}}}", path.display());
    let g = f.create(&text).unwrap();
    let mut g = g.borrow_mut();
    assert_eq!(g.poly_depth(), 2);
    assert_eq!(g.poly(0).as_slice(), &[0.5, -0.5]);
    assert_eq!(g.poly(1).as_slice(), &[0.25, -0.25]);
    assert_eq!(g.poly(2).as_slice(), &[0.5, -0.5]);
    assert_eq!(
        g.to_text(false),
        format!("PolyTableFile{{filePath{{{}}}}}", path.display())
    );
    std::fs::remove_file(&path).ok();
}

#[test]
fn buffer_of_stereo_source() {
    let env = env();
    let f = Factory::new(&env);
    let g = f
        .create("Buffer{operand1{PanStereo{operand1{1}panLeftRight{1}}}channels{2}frameSize{4}}")
        .unwrap();
    let mut g = g.borrow_mut();
    assert_eq!(g.poly_depth(), 2);
    let frame = g.poly(5);
    assert_relative_eq!(frame[0], 0.0);
    assert_relative_eq!(frame[1], 1.0);
}

#[test]
fn idle_trigger_holds_on_earlier_index() {
    let env = env();
    let f = Factory::new(&env);
    let graphs = [
        "RandomUniform{refresh{0}}",
        "Selector{valueList{1,2,3}refresh{0}selectionMethod{3}}",
    ];
    for graph in graphs.iter() {
        let g = f.create(graph).unwrap();
        let mut g = g.borrow_mut();
        let held = g.scalar(5);
        assert_eq!(g.scalar(3), held, "{}", graph);
        assert_eq!(g.scalar(0), held, "{}", graph);
        assert_eq!(g.scalar(9), held, "{}", graph);
    }
}
