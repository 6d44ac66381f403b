use super::*;

fn line(product: &str, price: f64, quantity: i32) -> LineItem {
    LineItem {
        product: product.to_string(),
        name: format!("{} name", product),
        image: "/img.jpg".to_string(),
        price,
        quantity,
    }
}

#[test]
fn test_totals_above_free_shipping_threshold() {
    let items = vec![line("product:p1", 600.0, 2)];
    let totals = compute_totals(&items);

    assert_eq!(totals.items_price, 1200.0);
    assert_eq!(totals.shipping_price, 0.0);
    assert_eq!(totals.tax_price, 216.0);
    assert_eq!(totals.total_price, 1416.0);
}

#[test]
fn test_totals_below_free_shipping_threshold() {
    let items = vec![line("product:p1", 300.0, 1)];
    let totals = compute_totals(&items);

    assert_eq!(totals.items_price, 300.0);
    assert_eq!(totals.shipping_price, 100.0);
    assert_eq!(totals.tax_price, 54.0);
    assert_eq!(totals.total_price, 454.0);
}

#[test]
fn test_threshold_is_strict() {
    // exactly 1000 still pays shipping
    let items = vec![line("product:p1", 500.0, 2)];
    let totals = compute_totals(&items);

    assert_eq!(totals.items_price, 1000.0);
    assert_eq!(totals.shipping_price, 100.0);

    let items = vec![line("product:p1", 500.005, 2)];
    let totals = compute_totals(&items);
    assert_eq!(totals.shipping_price, 0.0);
}

#[test]
fn test_empty_cart_totals() {
    let totals = compute_totals(&[]);

    assert_eq!(totals.items_price, 0.0);
    assert_eq!(totals.shipping_price, 100.0);
    assert_eq!(totals.tax_price, 0.0);
    assert_eq!(totals.total_price, 100.0);
}

#[test]
fn test_total_identity() {
    let items = vec![
        line("product:p1", 19.99, 3),
        line("product:p2", 4.25, 1),
        line("product:p3", 120.5, 2),
    ];
    let totals = compute_totals(&items);

    let expected =
        to_decimal(totals.items_price) + to_decimal(totals.shipping_price) + to_decimal(totals.tax_price);
    assert_eq!(to_f64(expected), totals.total_price);
}

#[test]
fn test_tax_rounds_half_up() {
    // 19.99 * 0.18 = 3.5982 -> 3.60
    let items = vec![line("product:p1", 19.99, 1)];
    let totals = compute_totals(&items);

    assert_eq!(totals.tax_price, 3.60);
}

#[test]
fn test_recompute_is_deterministic() {
    let items = vec![line("product:p1", 33.33, 3), line("product:p2", 0.1, 7)];
    let first = compute_totals(&items);
    let second = compute_totals(&items);

    assert_eq!(first.items_price, second.items_price);
    assert_eq!(first.shipping_price, second.shipping_price);
    assert_eq!(first.tax_price, second.tax_price);
    assert_eq!(first.total_price, second.total_price);
}

#[test]
fn test_money_eq_tolerance() {
    assert!(money_eq(100.00, 100.00));
    assert!(money_eq(100.00, 100.01));
    assert!(!money_eq(100.00, 100.02));
}

#[test]
fn test_totals_match_rejects_tampered_total() {
    let items = vec![line("product:p1", 300.0, 1)];
    let computed = compute_totals(&items);

    let mut submitted = computed;
    assert!(totals_match(&submitted, &computed));

    submitted.total_price = 1.0;
    assert!(!totals_match(&submitted, &computed));
}

#[test]
fn test_cart_add_merges_same_product() {
    let mut cart = Cart::new();
    cart.add(line("product:p1", 10.0, 1));
    cart.add(line("product:p1", 12.0, 2));

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 3);
    // snapshot fields refresh to the latest submission
    assert_eq!(cart.items()[0].price, 12.0);
}

#[test]
fn test_cart_set_quantity_zero_removes() {
    let mut cart = Cart::new();
    cart.add(line("product:p1", 10.0, 2));
    cart.add(line("product:p2", 5.0, 1));

    cart.set_quantity("product:p1", 0);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].product, "product:p2");

    cart.set_quantity("product:p2", -3);
    assert!(cart.is_empty());
}

#[test]
fn test_cart_totals_follow_mutations() {
    let mut cart = Cart::new();
    cart.add(line("product:p1", 600.0, 1));
    assert_eq!(cart.totals().shipping_price, 100.0);

    cart.set_quantity("product:p1", 2);
    assert_eq!(cart.totals().shipping_price, 0.0);
    assert_eq!(cart.totals().total_price, 1416.0);

    cart.remove("product:p1");
    assert_eq!(cart.totals().items_price, 0.0);
}
