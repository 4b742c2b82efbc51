use boog_terminal::roster::Roster;

#[test]
fn add_keeps_first_insertion_order_and_dedups() {
    let mut roster = Roster::new();
    assert!(roster.add("Ruth"));
    assert!(roster.add("Aaron"));
    assert!(!roster.add("Ruth"));
    assert!(roster.add("Mays"));
    assert!(!roster.add("Aaron"));
    assert_eq!(roster.selected(), ["Ruth", "Aaron", "Mays"]);
}

#[test]
fn remove_drops_the_entry() {
    let mut roster = Roster::new();
    roster.add("Ruth");
    roster.add("Aaron");
    roster.remove("Ruth");
    assert_eq!(roster.selected(), ["Aaron"]);
    assert!(!roster.contains("Ruth"));
}

#[test]
fn removing_absent_name_is_a_noop() {
    let mut roster = Roster::new();
    roster.add("Ruth");
    roster.remove("Mays");
    assert_eq!(roster.selected(), ["Ruth"]);
}

#[test]
fn clear_empties_the_list() {
    let mut roster = Roster::new();
    roster.add("Ruth");
    roster.add("Aaron");
    roster.clear();
    assert!(roster.is_empty());
    assert_eq!(roster.len(), 0);
    // Re-adding after a clear works as a fresh insertion.
    assert!(roster.add("Ruth"));
}
