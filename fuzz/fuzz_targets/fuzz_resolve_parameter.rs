#![no_main]

use arbitrary::Arbitrary;
use descriptor_validation::engine::{Node, Path};
use descriptor_validation::{OperationDescriptor, resolve_parameter};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum FuzzNode {
    Bean,
    Property(String),
    Method(String),
    Parameter(String, u8),
    CrossParameter,
    ReturnValue,
}

#[derive(Arbitrary, Debug)]
struct Input {
    arity: u8,
    nodes: Vec<FuzzNode>,
}

fuzz_target!(|input: Input| {
    let arity = input.arity as usize % 8;
    let operation = OperationDescriptor::new(
        "Fuzz",
        "call",
        (0..arity).map(|i| (format!("p{}", i), "String")),
    );
    let path: Path = input
        .nodes
        .into_iter()
        .map(|n| match n {
            FuzzNode::Bean => Node::bean(),
            FuzzNode::Property(name) => Node::property(name),
            FuzzNode::Method(name) => Node::method(name),
            FuzzNode::Parameter(name, index) => Node::parameter(name, index as usize),
            FuzzNode::CrossParameter => Node::cross_parameter(),
            FuzzNode::ReturnValue => Node::return_value(),
        })
        .collect();

    if let Some(parameter) = resolve_parameter(&path, &operation) {
        assert!(parameter.index() < arity);
        assert_eq!(path.nodes()[1].parameter_index(), Some(parameter.index()));
    }
});
