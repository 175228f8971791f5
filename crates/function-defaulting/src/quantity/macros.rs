/// This macro is intended to be used to implement conversion and serialization traits on
/// specialized quantities.
///
/// Currently two specialized quantities exist: [`MemoryQuantity`][1] and [`CpuQuantity`][2].
/// The traits are implemented by forwarding to the inner [`Quantity`][3] implementation. Both
/// specialized quantities are just newtypes / wrappers around [`Quantity`][3].
///
/// [1]: super::MemoryQuantity
/// [2]: super::CpuQuantity
/// [3]: super::Quantity
macro_rules! forward_quantity_impls {
    ($for:ident, $schema_name:literal) => {
        impl ::std::ops::Deref for $for {
            type Target = $crate::quantity::Quantity;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::str::FromStr for $for {
            type Err = $crate::quantity::ParseQuantityError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                Ok(Self(input.parse::<$crate::quantity::Quantity>()?))
            }
        }

        impl ::std::fmt::Display for $for {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::quantity::Quantity> for $for {
            fn from(quantity: $crate::quantity::Quantity) -> Self {
                Self(quantity)
            }
        }

        impl TryFrom<String> for $for {
            type Error = $crate::quantity::ParseQuantityError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$for> for String {
            fn from(value: $for) -> Self {
                value.to_string()
            }
        }

        impl TryFrom<&::k8s_openapi::apimachinery::pkg::api::resource::Quantity> for $for {
            type Error = $crate::quantity::ParseQuantityError;

            fn try_from(
                value: &::k8s_openapi::apimachinery::pkg::api::resource::Quantity,
            ) -> Result<Self, Self::Error> {
                Ok(Self($crate::quantity::Quantity::try_from(value)?))
            }
        }

        impl From<$for> for ::k8s_openapi::apimachinery::pkg::api::resource::Quantity {
            fn from(value: $for) -> Self {
                value.0.into()
            }
        }

        impl ::schemars::JsonSchema for $for {
            fn schema_name() -> ::std::borrow::Cow<'static, str> {
                $schema_name.into()
            }

            fn json_schema(generator: &mut ::schemars::SchemaGenerator) -> ::schemars::Schema {
                String::json_schema(generator)
            }
        }
    };
}

/// HACK: Make the macro only available in this crate.
pub(crate) use forward_quantity_impls;
