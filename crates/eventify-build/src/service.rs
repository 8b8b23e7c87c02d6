use crate::unit::ServiceUnit;
use convert_case::{Case, Casing};
use eventify_core::event::{EventConstituents, Hook, Method, capitalize, compose};
use eventify_schema::types::Primitive;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Token stream of one generated per-model service wrapper.
///
/// Each CRUD method publishes the model-level before event, delegates to
/// the injected client, publishes the after event with the result, and
/// returns the result unchanged. Field setters mirror the pattern with
/// the field-level update events; getters are plain lookups.
#[must_use]
pub fn service_unit(unit: &ServiceUnit) -> TokenStream {
    let service_ident = format_ident!("{}Service", capitalize(&unit.model));
    let model = unit.model.as_str();

    let mut methods = quote!();

    for method in Method::ALL {
        let method_ident = format_ident!("{}", method.to_string().to_case(Case::Snake));
        let before_key = compose(&EventConstituents::model_level(model, Hook::Before, method)).camel_case;
        let after_key = compose(&EventConstituents::model_level(model, Hook::After, method)).camel_case;

        methods.extend(quote! {
            pub fn #method_ident(&self, args: Value, ctx: Value) -> Result<Value, ClientError> {
                self.dispatcher.publish_event(
                    #before_key,
                    EventMeta::before(args.clone(), ctx.clone(), self.client.clone()),
                );
                let result = self.client.#method_ident(#model, &args)?;
                self.dispatcher.publish_event(
                    #after_key,
                    EventMeta::after(args, ctx, self.client.clone(), result.clone()),
                );
                Ok(result)
            }
        });
    }

    for field in &unit.fields {
        let field_name = field.name.as_str();
        let getter = format_ident!("get_{}", field.name.to_case(Case::Snake));
        let setter = format_ident!("set_{}", field.name.to_case(Case::Snake));
        let value_ty = value_type(field.primitive);

        let before_key = compose(&EventConstituents::field_level(
            model,
            field_name,
            Hook::Before,
            Method::Update,
        ))
        .camel_case;
        let after_key = compose(&EventConstituents::field_level(
            model,
            field_name,
            Hook::After,
            Method::Update,
        ))
        .camel_case;

        methods.extend(quote! {
            pub fn #getter(&self, id: Value) -> Result<Value, ClientError> {
                let row = self.client.find_unique(#model, &json!({ "where": { "id": id } }))?;
                Ok(row.get(#field_name).cloned().unwrap_or(Value::Null))
            }

            pub fn #setter(&self, id: Value, value: #value_ty, ctx: Value) -> Result<Value, ClientError> {
                let args = json!({ "where": { "id": id }, "data": { #field_name: value } });
                self.dispatcher.publish_event(
                    #before_key,
                    EventMeta::before(args.clone(), ctx.clone(), self.client.clone()),
                );
                let result = self.client.update(#model, &args)?;
                self.dispatcher.publish_event(
                    #after_key,
                    EventMeta::after(args, ctx, self.client.clone(), result.clone()),
                );
                Ok(result)
            }
        });
    }

    quote! {
        use ::eventify_core::client::{ClientError, DataClient, MemoryClient};
        use ::eventify_core::dispatch::{Dispatcher, EventMeta};
        use ::serde_json::{json, Value};
        use ::std::sync::Arc;

        pub struct #service_ident {
            dispatcher: Arc<Dispatcher>,
            client: Arc<dyn DataClient>,
        }

        impl #service_ident {
            #[must_use]
            pub fn new(dispatcher: Arc<Dispatcher>, client: Arc<dyn DataClient>) -> Self {
                Self { dispatcher, client }
            }

            #[must_use]
            pub fn with_memory_client(dispatcher: Arc<Dispatcher>) -> Self {
                Self::new(dispatcher, Arc::new(MemoryClient::new()))
            }

            #methods
        }
    }
}

// Host-language type for a symbolic field tag; unknown tags stay opaque.
fn value_type(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::Int => quote!(i64),
        Primitive::String | Primitive::DateTime => quote!(::std::string::String),
        Primitive::Boolean => quote!(bool),
        Primitive::Unknown => quote!(Value),
    }
}
