use std::path::Path;

use php_code_scanner::{FileReport, TokenArrayScanner, tokenize};

const CART: &str = r"<?php
namespace Shop;

use Money\Price;

class Cart extends Base implements \Countable
{
    const MAX = 10;
    private array $items = [];

    public function add(Price $price, int $qty = 1): void
    {
        $this->items[] = $price;
    }
}

function total(Cart $cart): int { return 0; }
";

#[test]
fn text_report_lists_every_declaration() {
    let scanner = TokenArrayScanner::new(tokenize(CART));
    let report = FileReport::build(&scanner, None).unwrap();
    insta::assert_snapshot!(report.to_string().trim_end(), @r"
<source>
  namespace Shop
  use Money\Price
  class Shop\Cart extends Shop\Base implements Countable lines 6-15
    const MAX = 10
    private $items: array = []
    public function add(Money\Price $price, int $qty = 1): void lines 11-14
  function Shop\total(Shop\Cart $cart): int lines 17-17
");
}

#[test]
fn json_report_flattens_class_info() {
    let scanner = TokenArrayScanner::new(tokenize(CART));
    let report = FileReport::build(&scanner, Some(Path::new("src/Cart.php"))).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["path"], "src/Cart.php");
    assert_eq!(json["classes"][0]["name"], "Shop\\Cart");
    assert_eq!(json["classes"][0]["kind"], "class");
    assert_eq!(json["classes"][0]["methods"][0]["parameters"][1]["default_value"], "1");
    assert_eq!(json["functions"][0]["qualified_name"], "Shop\\total");
}

#[test]
fn empty_source_gives_an_empty_report() {
    let scanner = TokenArrayScanner::new(tokenize(""));
    let report = FileReport::build(&scanner, None).unwrap();
    assert!(report.classes.is_empty());
    assert_eq!(report.to_string(), "<source>\n");
}
