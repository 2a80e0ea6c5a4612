use memora::{memoize_unary, EqualityOptions, MemoizeOptions, Value};

fn request(page: u32) -> Value {
    Value::object([
        ("url", Value::from("http://localhost/users")),
        (
            "params",
            Value::object([("page", Value::from(page)), ("per_page", Value::from(10))]),
        ),
    ])
}

fn main() -> Result<(), memora::MemoError> {
    println!("=== Memora: deep equality with LRU eviction ===\n");

    let fetch = memoize_unary(
        |req: &Value| {
            let page = req
                .get("params")
                .and_then(|params| params.get("page"))
                .cloned()
                .unwrap_or_default();
            println!("  fetching page {}", page);
            format!("<users page {}>", page)
        },
        MemoizeOptions::new()
            .equality(EqualityOptions::deep().with_size(2))
            .name("fetch_users"),
    )?;

    // Every request is a freshly built object; deep equality still finds it
    for page in [1, 1, 2, 1, 3, 2, 1] {
        let body = fetch.call_one(request(page))?;
        println!("page {} -> {}", page, body);
    }

    println!("\ncached responses (most recent first): {:?}", fetch.entries());
    Ok(())
}
