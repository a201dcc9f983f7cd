use std::str::FromStr;

use knuffel::errors::DecodeError;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outputs(pub Vec<Output>);

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Output {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(argument)]
    pub name: String,
    #[knuffel(child, unwrap(argument, str))]
    pub mode: Option<OutputMode>,
    #[knuffel(child, unwrap(argument))]
    pub scale: Option<OutputScale>,
}

/// Output mode as set in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMode {
    /// Width in physical pixels.
    pub width: u16,
    /// Height in physical pixels.
    pub height: u16,
}

/// Output scale as set in the config file: a number above 0 and at most 10.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputScale(pub f64);

impl FromIterator<Output> for Outputs {
    fn from_iter<T: IntoIterator<Item = Output>>(iter: T) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl Outputs {
    pub fn find(&self, name: &str) -> Option<&Output> {
        self.0.iter().find(|o| o.name.eq_ignore_ascii_case(name))
    }
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((width, height)) = s.split_once('x') else {
            return Err("no 'x' separator found");
        };

        let width = width.parse().map_err(|_| "error parsing width")?;
        let height = height.parse().map_err(|_| "error parsing height")?;
        if width == 0 || height == 0 {
            return Err("mode width and height must be positive");
        }

        Ok(Self { width, height })
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for OutputScale {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        let scale = match &**val {
            knuffel::ast::Literal::Int(value) => i32::try_from(value).ok().map(f64::from),
            knuffel::ast::Literal::Decimal(value) => f64::try_from(value).ok(),
            _ => {
                ctx.emit_error(DecodeError::unsupported(val, "scale must be a number"));
                return Ok(Self(1.));
            }
        };

        match scale {
            Some(scale) if scale > 0. && scale <= 10. => Ok(Self(scale)),
            _ => {
                ctx.emit_error(DecodeError::conversion(
                    val,
                    "scale must be above 0 and at most 10",
                ));
                Ok(Self(1.))
            }
        }
    }
}
