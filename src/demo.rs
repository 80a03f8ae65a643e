//! Built-in pet store services, served by the CLI.
use crate::describe_struct;
use crate::service::{WebService, MIME_JSON, MIME_XML};

describe_struct! {
    unit "petstore";
    #[derive(Clone, Debug, Default)]
    pub struct Category {
        pub id: i64,
        pub name: String,
    }
}

describe_struct! {
    unit "petstore";
    #[derive(Clone, Debug, Default)]
    pub struct Tag {
        pub id: i64,
        pub name: String,
    }
}

describe_struct! {
    unit "petstore";
    #[derive(Clone, Debug, Default)]
    #[allow(dead_code)]
    pub struct Pet {
        pub id: i64 => r#"swagger:"required" description:"unique identifier""#,
        pub name: String => r#"swagger:"required""#,
        pub category: Option<Box<Category>>,
        pub photo_urls: Vec<String> => r#"json:"photoUrls""#,
        pub tags: Vec<Tag>,
        pub status: String => r#"description:"available, pending or sold""#,
        pub sold_to: Option<Box<Owner>> => r#"json:"soldTo""#,
        revision: u64,
    }
}

describe_struct! {
    unit "petstore";
    #[derive(Clone, Debug, Default)]
    pub struct Owner {
        pub id: i64,
        pub name: String,
        pub pets: Vec<Pet>,
    }
}

describe_struct! {
    unit "petstore";
    #[derive(Clone, Debug, Default)]
    pub struct Order {
        pub id: i64,
        pub pet_id: i64 => r#"json:"petId""#,
        pub quantity: u32,
        pub ship_date: String => r#"json:"shipDate""#,
        pub complete: bool,
        pub notify: Option<fn(i64)> => r#"json:"-""#,
    }
}

describe_struct! {
    unit "petstore";
    #[derive(Clone, Debug, Default)]
    pub struct ApiResponse {
        pub code: i32,
        pub message: String,
    }
}

pub fn services() -> Vec<WebService> {
    let mut pets = WebService::new();
    pets.path("/pet")
        .doc("Everything about your pets")
        .consumes([MIME_JSON, MIME_XML])
        .produces([MIME_JSON, MIME_XML]);
    pets.route(
        pets.post("")
            .to("addPet")
            .doc("Add a new pet to the store")
            .reads::<Pet>()
            .writes::<ApiResponse>(),
    );
    pets.route(pets.put("").to("updatePet").doc("Update an existing pet").reads::<Pet>());
    pets.route(pets.get("/findByStatus").to("findPetsByStatus").writes::<Vec<Pet>>());
    pets.route(pets.get("/{petId}").to("getPetById").writes_sample(&Pet::default()));
    pets.route(pets.delete("/{petId}").to("deletePet"));

    let mut store = WebService::new();
    store.path("/store").doc("Access to pet store orders").produces([MIME_JSON]);
    store.route(store.post("/order").to("placeOrder").reads::<Order>().writes::<Order>());
    store.route(store.get("/order/{orderId}").to("getOrderById").writes::<Order>());
    store.route(store.get("/inventory").to("getInventory").writes::<Vec<i32>>());

    vec![pets, store]
}
