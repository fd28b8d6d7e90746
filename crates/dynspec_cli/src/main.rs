//! CLI smoke entry point.
//!
//! # Responsibility
//! - Build one predicate from `<member> <operator> <value>` against a demo
//!   `Product` entity and print its SQL translation.
//! - Print the core version when called without arguments.

use dynspec_core::db::{select_sql, to_sql};
use dynspec_core::{Entity, EntityType, PredicateBuilder, Specification, Value, ValueKind};
use once_cell::sync::Lazy;
use std::process::ExitCode;

struct Product {
    name: String,
    price: f64,
    stock: i64,
}

impl Entity for Product {
    fn entity_type() -> &'static EntityType<Self> {
        static PRODUCT: Lazy<EntityType<Product>> = Lazy::new(|| {
            EntityType::<Product>::builder("Product", "products")
                .member("Name", ValueKind::Text, |p| p.name.as_str().into())
                .member("Price", ValueKind::Float, |p| p.price.into())
                .member("Stock", ValueKind::Int, |p| Value::Int(p.stock))
                .build()
        });
        &PRODUCT
    }
}

fn demo_products() -> Vec<Product> {
    [("Widget", 15.0, 4), ("Gadget", 5.0, 0), ("Gizmo", 10.0, 12)]
        .into_iter()
        .map(|(name, price, stock)| Product {
            name: name.to_string(),
            price,
            stock,
        })
        .collect()
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [member, operator, value] = args.as_slice() else {
        println!("dynspec_core version={}", dynspec_core::core_version());
        println!("usage: dynspec_cli <member> <operator> <value>");
        return ExitCode::SUCCESS;
    };

    let predicate = match PredicateBuilder::parse(member.as_str(), operator, value.as_str())
        .build(Product::entity_type())
    {
        Ok(predicate) => predicate,
        Err(err) => {
            eprintln!("error[{}]: {err}", err.code());
            return ExitCode::from(2);
        }
    };

    let spec = Specification::from(predicate);
    let filter = to_sql(&spec);
    let params: Vec<String> = filter.params.iter().map(ToString::to_string).collect();
    println!("predicate: {spec}");
    println!("where:     {}", filter.sql);
    println!("params:    [{}]", params.join(", "));
    println!("select:    {}", select_sql(Product::entity_type(), &spec).sql);

    let products = demo_products();
    let matches: Vec<&str> = spec
        .filter(&products)
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    println!("demo:      [{}]", matches.join(", "));
    ExitCode::SUCCESS
}
