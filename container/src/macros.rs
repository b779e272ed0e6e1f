//! Public macros for describing constructors and resolving services.

/// Implements [`Injectable`](crate::Injectable) for a struct.
///
/// Each listed field is an `Arc<Dep>` resolved from the identifier of `Dep`
/// (its unqualified type name), or from an explicit identifier given after
/// `=>`. Fields are declared as constructor parameters in the order written.
///
/// # Examples
///
/// ```
/// use fibre_container::{injectable, Container};
/// use std::sync::Arc;
///
/// struct Logger;
/// injectable!(Logger);
///
/// struct Mailer {
///   logger: Arc<Logger>,
///   sender: Arc<String>,
/// }
/// injectable!(Mailer { logger: Logger, sender: String => "mail.sender" });
///
/// let c = Container::new();
/// c.singleton_type::<Logger>().unwrap();
/// c.instance("mail.sender", String::from("noreply@example.com")).unwrap();
/// c.transient_type::<Mailer>().unwrap();
///
/// let mailer = c.resolve::<Mailer>("Mailer").unwrap();
/// assert_eq!(*mailer.sender, "noreply@example.com");
/// ```
#[macro_export]
macro_rules! injectable {
    (@param $field:ident, $dep:ty) => {
        $crate::Parameter::of::<$dep>(stringify!($field))
    };
    (@param $field:ident, $dep:ty, $id:expr) => {
        $crate::Parameter::typed(stringify!($field), $id)
    };

    // Unit struct: injectable!(Logger)
    ($ty:ident) => {
        impl $crate::Injectable for $ty {
            fn construct(_args: &$crate::Arguments) -> $crate::Result<Self> {
                Ok($ty)
            }
        }
    };

    // Zero-argument constructor expression: injectable!(Clock = Clock::system())
    ($ty:ident = $ctor:expr) => {
        impl $crate::Injectable for $ty {
            fn construct(_args: &$crate::Arguments) -> $crate::Result<Self> {
                Ok($ctor)
            }
        }
    };

    // Struct with injected fields: injectable!(Service { logger: Logger, db: Db => "primary" })
    ($ty:ident { $($field:ident : $dep:ty $(=> $id:expr)?),* $(,)? }) => {
        impl $crate::Injectable for $ty {
            fn parameters() -> ::std::vec::Vec<$crate::Parameter> {
                ::std::vec![$($crate::injectable!(@param $field, $dep $(, $id)?)),*]
            }

            fn construct(args: &$crate::Arguments) -> $crate::Result<Self> {
                Ok($ty {
                    $($field: args.get::<$dep>(stringify!($field))?,)*
                })
            }
        }
    };
}

/// Resolves a service from a container, downcasting it to the given type.
///
/// Without an identifier, the unqualified type name is used. Expands to a
/// `Result<Arc<T>, ContainerError>`.
///
/// # Examples
///
/// ```
/// use fibre_container::{resolve, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let c = Container::new();
/// c.instance("greeting", String::from("hi")).unwrap();
/// c.instance_arc::<dyn Greeter>("Greeter", Arc::new(EnglishGreeter)).unwrap();
///
/// assert_eq!(*resolve!(c, String, "greeting").unwrap(), "hi");
/// assert_eq!(resolve!(c, trait Greeter).unwrap().greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // resolve!(container, trait MyTrait)
    ($container:expr, trait $trait_ident:ident) => {
        $container.resolve::<dyn $trait_ident>($crate::ServiceId::of::<dyn $trait_ident>())
    };

    // resolve!(container, trait MyTrait, "name")
    ($container:expr, trait $trait_ident:ident, $name:expr) => {
        $container.resolve::<dyn $trait_ident>($name)
    };

    // resolve!(container, MyService)
    ($container:expr, $type:ty) => {
        $container.resolve::<$type>($crate::ServiceId::of::<$type>())
    };

    // resolve!(container, MyService, "name")
    ($container:expr, $type:ty, $name:expr) => {
        $container.resolve::<$type>($name)
    };
}
