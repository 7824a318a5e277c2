use serde_json::{json, Value};
use storefront_paging::InMemoryBackend;

pub struct Seed {
    pub id: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub discount: f64,
    pub colors: &'static [&'static str],
    pub sizes: &'static [&'static str],
    pub style: &'static str,
    pub ratings: Value,
    pub created_at: i64,
}

impl Seed {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.id.to_uppercase(),
            "category": self.category,
            "price": self.price,
            "discount": self.discount,
            "colors": self.colors,
            "sizes": self.sizes,
            "style": self.style,
            "ratings": self.ratings,
            "created_at": self.created_at,
            "published": true,
        })
    }
}

/// Twelve published products across two categories plus one draft.
pub fn catalog() -> InMemoryBackend {
    let seeds = [
        Seed { id: "tee", category: "tops", price: 30.0, discount: 0.0, colors: &["white", "black"], sizes: &["S", "M"], style: "casual", ratings: json!({"5": 4, "4": 1}), created_at: 1 },
        Seed { id: "polo", category: "tops", price: 80.0, discount: 0.25, colors: &["blue"], sizes: &["M", "L"], style: "casual", ratings: json!({"3": 6}), created_at: 2 },
        Seed { id: "blouse", category: "tops", price: 90.0, discount: 0.0, colors: &["white"], sizes: &["S"], style: "formal", ratings: json!({}), created_at: 3 },
        Seed { id: "hoodie", category: "tops", price: 120.0, discount: 0.0, colors: &["black", "grey"], sizes: &["L", "XL"], style: "gym", ratings: json!({"4": 9, "5": 1}), created_at: 4 },
        Seed { id: "shirt", category: "tops", price: 100.0, discount: 0.4, colors: &["blue", "white"], sizes: &["M"], style: "formal", ratings: json!({"5": 2}), created_at: 5 },
        Seed { id: "tank", category: "tops", price: 20.0, discount: 0.0, colors: &["red"], sizes: &["S", "M", "L"], style: "gym", ratings: json!({"2": 3, "4": 3}), created_at: 6 },
        Seed { id: "jeans", category: "bottoms", price: 110.0, discount: 0.1, colors: &["blue"], sizes: &["M", "L"], style: "casual", ratings: json!({"4": 12}), created_at: 7 },
        Seed { id: "chinos", category: "bottoms", price: 75.0, discount: 0.0, colors: &["beige", "black"], sizes: &["M"], style: "formal", ratings: json!({"5": 1, "1": 1}), created_at: 8 },
        Seed { id: "shorts", category: "bottoms", price: 35.0, discount: 0.0, colors: &["grey"], sizes: &["S", "M"], style: "gym", ratings: json!({"3": 2}), created_at: 9 },
        Seed { id: "skirt", category: "bottoms", price: 60.0, discount: 0.0, colors: &["black"], sizes: &["S"], style: "party", ratings: json!({"5": 7}), created_at: 10 },
        Seed { id: "joggers", category: "bottoms", price: 55.0, discount: 0.2, colors: &["grey", "black"], sizes: &["L"], style: "gym", ratings: json!({"4": 5}), created_at: 11 },
        Seed { id: "trousers", category: "bottoms", price: 95.0, discount: 0.0, colors: &["black"], sizes: &["M", "L"], style: "formal", ratings: json!({"4": 2, "5": 2}), created_at: 12 },
    ];

    let backend = InMemoryBackend::new();
    for seed in &seeds {
        backend.insert_json("products", seed.to_json()).unwrap();
    }
    backend
        .insert_json(
            "products",
            json!({"id": "draft", "name": "Draft", "category": "tops", "price": 1, "created_at": 99, "published": false}),
        )
        .unwrap();
    backend
}

/// Four products with effective prices 30, 60, 90 and 120.
pub fn price_ladder() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    for (i, (id, price, discount)) in [("a", 30.0, 0.0), ("b", 120.0, 0.5), ("c", 90.0, 0.0), ("d", 120.0, 0.0)]
        .into_iter()
        .enumerate()
    {
        backend
            .insert_json(
                "products",
                json!({
                    "id": id,
                    "name": id,
                    "price": price,
                    "discount": discount,
                    "ratings": {"5": i},
                    "created_at": i,
                    "published": true,
                }),
            )
            .unwrap();
    }
    backend
}
