use crate::unit::{ConfigTypesUnit, ConfigUnit, EventsUnit};
use eventify_core::event::Hook;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Token stream of the events-registry unit: a `catalog()` constructor
/// re-declaring every event of the generation pass.
#[must_use]
pub fn events_unit(unit: &EventsUnit) -> TokenStream {
    let mut declares = quote!();

    for (_, descriptor) in unit.catalog.iter() {
        let constituents = &descriptor.constituents;
        let (Some(hook), Some(method)) = (constituents.hook, constituents.method) else {
            continue;
        };

        let model = constituents.model.as_str();
        let hook = format_ident!("{}", format!("{hook:?}"));
        let method = format_ident!("{}", format!("{method:?}"));

        let make = constituents.field.as_deref().map_or_else(
            || quote!(EventConstituents::model_level(#model, Hook::#hook, Method::#method)),
            |field| {
                quote!(EventConstituents::field_level(#model, #field, Hook::#hook, Method::#method))
            },
        );

        declares.extend(quote! {
            catalog.declare(EventDescriptor::new(#make));
        });
    }

    quote! {
        use ::eventify_core::catalog::{EventCatalog, EventDescriptor};
        use ::eventify_core::event::{EventConstituents, Hook, Method};

        #[must_use]
        pub fn catalog() -> EventCatalog {
            let mut catalog = EventCatalog::new();
            #declares
            catalog
        }
    }
}

/// Token stream of the config stub: one noop entry per declared event.
#[must_use]
pub fn config_unit(unit: &ConfigUnit) -> TokenStream {
    let mut puts = quote!();

    for entry in &unit.entries {
        let name = entry.name.as_str();
        puts.extend(quote! {
            table.put(#name, HookCallback::Noop);
        });
    }

    quote! {
        use ::eventify_core::config::{ConfigTable, HookCallback};

        #[must_use]
        pub fn config() -> ConfigTable {
            let mut table = ConfigTable::new();
            #puts
            table
        }
    }
}

/// Token stream of the config type declarations: a record with one
/// optional function-typed field per event key, convertible into a
/// `ConfigTable`. Hand-edited config is written against this record so
/// catalog drift surfaces as a compile error.
#[must_use]
pub fn config_types_unit(unit: &ConfigTypesUnit) -> TokenStream {
    let mut fields = quote!();
    let mut puts = quote!();

    for entry in &unit.entries {
        let name = entry.name.as_str();
        let ident = format_ident!("{}", entry.ident);

        let (fn_ty, variant) = match entry.hook {
            Hook::Before => (quote!(BeforeFn), format_ident!("Before")),
            Hook::After => (quote!(AfterFn), format_ident!("After")),
        };

        fields.extend(quote! {
            pub #ident: ::std::option::Option<#fn_ty>,
        });
        puts.extend(quote! {
            table.put(#name, self.#ident.map_or(HookCallback::Noop, HookCallback::#variant));
        });
    }

    quote! {
        use ::eventify_core::config::{AfterFn, BeforeFn, ConfigTable, HookCallback};

        #[derive(Default)]
        pub struct EventsConfig {
            #fields
        }

        impl EventsConfig {
            #[must_use]
            pub fn into_table(self) -> ConfigTable {
                let mut table = ConfigTable::new();
                #puts
                table
            }
        }
    }
}
