use knuffel::errors::DecodeError;
use trellis_ipc::Layout;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Workspace {
    #[knuffel(argument)]
    pub name: WorkspaceName,
    #[knuffel(child, unwrap(argument))]
    pub open_on_output: Option<String>,
    #[knuffel(child, unwrap(argument, str))]
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceName(pub String);

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for WorkspaceName {
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
    ) -> Result<WorkspaceName, DecodeError<S>> {
        // Names seen so far in this document, for the duplicate check.
        #[derive(Debug)]
        struct SeenNames(Vec<String>);

        let knuffel::ast::Literal::String(ref s) = &**val else {
            ctx.emit_error(DecodeError::unsupported(
                val,
                "workspace names must be strings",
            ));
            return Ok(Self(String::new()));
        };

        if s.trim().is_empty() {
            ctx.emit_error(DecodeError::conversion(val, "workspace name must not be empty"));
            return Ok(Self(String::new()));
        }

        let mut seen = ctx.get::<SeenNames>().map(|h| h.0.clone()).unwrap_or_default();
        if seen.iter().any(|name| name.eq_ignore_ascii_case(s)) {
            ctx.emit_error(DecodeError::unexpected(
                val,
                "named workspace",
                format!("duplicate named workspace: {s}"),
            ));
            return Ok(Self(String::new()));
        }

        seen.push(s.to_string());
        ctx.set(SeenNames(seen));
        Ok(Self(s.to_string()))
    }
}
