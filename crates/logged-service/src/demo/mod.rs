//! A small shop whose operations are all intercepted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use logged::{
    loggable, logged_call, CallSite, ContextVariable, ConverterRegistry, FnConverter, FnVariable, Interceptor, Level, LogSink, Loggable, Parameter, TypeInfo, Value,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::Error;

static ENTITY: TypeInfo = TypeInfo::interface("shop::Entity");
static CUSTOMER: TypeInfo = TypeInfo::class("shop::Customer").implements(&[&ENTITY]);
static ORDER: TypeInfo = TypeInfo::class("shop::Order").implements(&[&ENTITY]);

static SHOP: TypeInfo = TypeInfo::class("shop::Shop");
static PRICING: TypeInfo = TypeInfo::class("shop::Shop::Pricing").nested_in(&SHOP);

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: u64,
    pub name: String,
}

loggable!(Customer => &CUSTOMER, |customer| Value::String(customer.name.clone()));

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: u64,
    pub customer: u64,
    pub item: String,
    pub quantity: u32,
    pub discount: u32,
}

loggable!(Order => &ORDER, |order| Value::UInt(order.id));

#[derive(Error, Debug, PartialEq)]
pub enum ShopError {
    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("an order needs at least one item")]
    EmptyOrder,
}

struct Sites {
    find_customer: CallSite,
    place_order: CallSite,
    discount: CallSite,
}

impl Sites {
    fn new() -> Self {
        Self {
            find_customer: CallSite::builder(&SHOP, "findCustomer")
                .parameter(Parameter::new("id").context("customer-id"))
                .build(),
            place_order: CallSite::builder(&SHOP, "placeOrder")
                .level(Level::Info)
                .parameter(Parameter::new("customer").context("customer"))
                .parameter(Parameter::new("item"))
                .parameter(Parameter::new("quantity"))
                .build(),
            discount: CallSite::builder(&PRICING, "discount_for")
                .level(Level::Trace)
                .parameter(Parameter::new("quantity").dont_log().context("quantity"))
                .build(),
        }
    }
}

pub struct Shop {
    interceptor: Interceptor,
    sites: Sites,

    stock: HashMap<String, u32>,
    next_order: AtomicU64,
}

impl Shop {
    pub fn new(sink: Arc<dyn LogSink>, configuration: logged::Configuration) -> Result<Self, Error> {
        // entities render as `<type>#<id>` wherever no closer converter applies
        let converters = ConverterRegistry::builder()
            .register(FnConverter::typed::<Customer, _>("customer", &[&CUSTOMER], |x| Value::String(format!("{}#{}", x.name, x.id))).into_arc())
            .register(
                FnConverter::new("entity", &[&ENTITY], |x| Value::String(format!("{}#{}", x.type_info().name(), x.to_value()))).into_arc(),
            )
            .build()?;

        let interceptor = Interceptor::builder(Arc::new(converters), sink)
            .configuration(configuration)
            .variable(Arc::new(FnVariable::new(|| {
                thread::current().name().map(|x| ContextVariable::new("thread", x))
            })))
            .build();

        Ok(Self {
            interceptor,
            sites: Sites::new(),
            stock: HashMap::from([("book".to_string(), 10), ("pen".to_string(), 100)]),
            next_order: AtomicU64::new(1),
        })
    }

    pub fn find_customer(&self, id: u64) -> Customer {
        self.interceptor.call(&self.sites.find_customer, &[Some(&id)], || Customer {
            id,
            name: format!("customer-{}", id),
        })
    }

    pub fn place_order(&self, customer: &Customer, item: &str, quantity: u32) -> Result<Order, ShopError> {
        let item = item.to_string();

        logged_call!(self.interceptor, &self.sites.place_order, [*customer, item, quantity] => {
            if quantity == 0 {
                return Err(ShopError::EmptyOrder);
            }
            if self.stock.get(&item).copied().unwrap_or_default() < quantity {
                return Err(ShopError::OutOfStock(item.clone()));
            }

            Ok(Order {
                id: self.next_order.fetch_add(1, Ordering::SeqCst),
                customer: customer.id,
                item: item.clone(),
                quantity,
                discount: self.discount_for(quantity),
            })
        })
    }

    /// Discount in percent: one more per additional item, at most ten.
    pub fn discount_for(&self, quantity: u32) -> u32 {
        self.interceptor.call(&self.sites.discount, &[Some(&quantity)], || {
            if quantity <= 1 {
                0
            } else {
                (self.discount_for(quantity - 1) + 1).min(10)
            }
        })
    }
}

/// Places a few orders, some of them failing, from several threads.
pub fn run(shop: &Shop) {
    let customer = shop.find_customer(1);
    for (item, quantity) in [("book", 3), ("book", 0), ("umbrella", 1)] {
        match shop.place_order(&customer, item, quantity) {
            Ok(order) => info!(
                order = order.id,
                customer = order.customer,
                item = %order.item,
                quantity = order.quantity,
                discount = order.discount,
                "order placed"
            ),
            Err(e) => warn!("order of {} rejected: {}", item, e),
        }
    }

    thread::scope(|scope| {
        for id in 2..4 {
            let spawned = thread::Builder::new().name(format!("clerk-{}", id)).spawn_scoped(scope, move || {
                let customer = shop.find_customer(id);
                if let Err(e) = shop.place_order(&customer, "pen", 12) {
                    warn!("order of pen rejected: {}", e);
                }
            });

            if let Err(e) = spawned {
                warn!("could not spawn clerk {}: {}", id, e);
            }
        }
    });
}
