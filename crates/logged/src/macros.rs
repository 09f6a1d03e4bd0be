/// Implements [`Loggable`](crate::converter::Loggable) for a type, given its
/// [`TypeInfo`](crate::converter::TypeInfo) and its identity rendering.
/// Example
/// ```rust
/// use logged::{loggable, TypeInfo, Value};
///
/// pub struct Customer {
///     name: String,
/// }
///
/// static CUSTOMER: TypeInfo = TypeInfo::class("shop::Customer");
///
/// loggable!(Customer => &CUSTOMER, |customer| Value::String(customer.name.clone()));
/// ```
#[macro_export]
macro_rules! loggable {
    ($t: ty => $info: expr, |$value: ident| $render: expr) => {
        impl $crate::converter::Loggable for $t {
            fn type_info(&self) -> &'static $crate::converter::TypeInfo {
                $info
            }

            fn to_value(&self) -> $crate::converter::Value {
                let $value = self;
                $render
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
}

/// Convenience macro to wrap a fallible call with an [`Interceptor`](crate::Interceptor).
/// Arguments are given in the parameter order of the [`CallSite`](crate::CallSite).
/// Example
/// ```ignore
/// use logged::logged_call;
///
/// // Equivalent to
/// // interceptor.around(&site, &[Some(&customer), Some(&amount)], || orders.place(&customer, amount))
/// let result = logged_call!(interceptor, &site, [customer, amount] => orders.place(&customer, amount));
/// ```
#[macro_export]
macro_rules! logged_call {
    ($interceptor: expr, $site: expr, [$($arg: expr),*] => $call: expr) => {
        $interceptor.around($site, &[$(Some(&$arg as &dyn $crate::converter::Loggable)),*], || $call)
    };
}
