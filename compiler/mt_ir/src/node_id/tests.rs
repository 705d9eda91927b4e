use super::*;

#[test]
fn test_node_id_valid() {
    let id = NodeId::new(42);
    assert!(id.is_valid());
    assert_eq!(id.index(), 42);
    assert_eq!(id.raw(), 42);
}

#[test]
fn test_node_id_invalid() {
    assert!(!NodeId::INVALID.is_valid());
    assert!(!NodeId::default().is_valid());
    assert!(!ExprId::default().node().is_valid());
}

#[test]
fn test_category_id_converts_to_node_id() {
    let expr = ExprId::from_node(NodeId::new(7));
    let node: NodeId = expr.into();
    assert_eq!(node, NodeId::new(7));
    assert_eq!(expr.index(), 7);
}

#[test]
fn test_debug_format() {
    assert_eq!(format!("{:?}", NodeId::new(3)), "#3");
    assert_eq!(format!("{:?}", NodeId::INVALID), "#INVALID");
    assert_eq!(format!("{:?}", StmtId::from_node(NodeId::new(5))), "StmtId(#5)");
}

#[test]
fn test_node_id_hash() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(NodeId::new(1));
    set.insert(NodeId::new(1));
    set.insert(NodeId::new(2));
    assert_eq!(set.len(), 2);
}
