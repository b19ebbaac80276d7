use avl_index::AvlTree;

fn main() {
    let mut tree = AvlTree::new();
    tree.insert("zero", 0);
    tree.insert("one", 1);
    tree.insert("two", 2);
    tree.insert("two", 22);
    tree.insert("three", 3);
    tree.insert("four", 4);
    tree.insert("five", 5);
    assert_eq!(tree.get("two"), Some(2));
    tree.remove("one");
    assert!(tree.get("one").is_none());

    for word in ["four", "four", "six"] {
        tree[word] += 1;
    }
    assert_eq!(tree["four"], 6);
    assert_eq!(tree["six"], 1);

    for (key, value) in &tree {
        println!("{key} => {value}");
    }
    println!("between f and t: {:?}", tree.find_range("f", "t"));
    println!("height {} for {} entries:", tree.height(), tree.len());
    print!("{tree}");
}
