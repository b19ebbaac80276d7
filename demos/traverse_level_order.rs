use avl_index::AvlTree;

fn main() {
    let mut tree = AvlTree::new();
    tree.insert("1", 1);
    tree.insert("2", 2);
    tree.insert("3", 3);
    tree.insert("4", 4);
    tree.insert("5", 5);
    tree.insert("6", 6);

    println!("Level-order traversal:");
    tree.traverse_level_order(|k, v| {
        println!("Key: {}, Value: {}", k, v);
    });
}
