use descriptor_validation::engine::{Node, Path};
use descriptor_validation::{OperationDescriptor, resolve_parameter};
use proptest::prelude::*;

fn arb_node() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::bean()),
        "[a-z]{1,6}".prop_map(|name| Node::property(name)),
        "[a-z]{1,6}".prop_map(|name| Node::method(name)),
        ("[a-z]{1,6}", 0usize..8).prop_map(|(name, index)| Node::parameter(name, index)),
        Just(Node::cross_parameter()),
        Just(Node::return_value()),
    ]
}

fn operation(arity: usize) -> OperationDescriptor {
    let parameters = (0..arity).map(|i| (format!("p{}", i), "String"));
    OperationDescriptor::new("Entity01", "method", parameters)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Resolution never panics and only ever returns the parameter the
    // second node names.
    #[test]
    fn resolves_only_second_node_parameters(
        nodes in proptest::collection::vec(arb_node(), 0..5),
        arity in 0usize..6,
    ) {
        let op = operation(arity);
        let path: Path = nodes.iter().cloned().collect();
        let expected = nodes
            .get(1)
            .and_then(Node::parameter_index)
            .filter(|index| *index < arity);
        let resolved = resolve_parameter(&path, &op);
        prop_assert_eq!(resolved.as_ref().map(|p| p.index()), expected);
        if let Some(parameter) = resolved {
            let declared = op.parameter(parameter.index()).unwrap();
            prop_assert!(std::sync::Arc::ptr_eq(&parameter, declared));
        }
    }

    // The first node's kind does not matter.
    #[test]
    fn first_node_is_ignored(first in arb_node(), index in 0usize..4) {
        let op = operation(4);
        let path = Path::new()
            .with_node(first)
            .with_node(Node::parameter("p", index));
        prop_assert_eq!(resolve_parameter(&path, &op).map(|p| p.index()), Some(index));
    }
}
