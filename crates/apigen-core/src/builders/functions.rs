//! Endpoint-to-function assembly.
//!
//! Each endpoint becomes one [`FunctionData`]: a name from its path, a
//! parameter list shaped by the configured [`ParamMode`], a return type from
//! the resolved response reference, and the request payload expressions the
//! templates emit.
//!
//! In aggregated mode query parameters collapse into a synthetic record
//! named after the URL (`/resource/list` gives `ResourceListParam`). The
//! record is registered once in the reference table and the resolver;
//! assembling the same endpoint again reuses it.

use crate::config::{GenMode, GeneratorConfig, ParamMode, TypeScope};
use crate::error::{Error, Result};
use crate::model::{Endpoint, EndpointGroup, Field, HttpMethod, ReferenceTable};
use crate::resolver::TypeResolver;
use crate::rules::{apply_fix_rules, order_by_rules};
use crate::templates::{FunctionData, FunctionFileData, FunctionParam, ScopeFlags};
use crate::utils::{capitalize, path_segment};

use super::{collect_imports, qualify_type_names};

/// Suffix of synthetic query records
pub const QUERY_RECORD_SUFFIX: &str = "Param";

/// Name of the synthetic record holding the query parameters of `path`
pub fn query_record_name(path: &str) -> String {
    let mut name: String = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.contains('{'))
        .map(capitalize)
        .collect();
    name.push_str(QUERY_RECORD_SUFFIX);
    name
}

/// Request URL with every `{name}` placeholder turned into `${name}`
pub fn template_url(path: &str) -> String {
    path.replace('{', "${")
}

/// Object shorthand for a list of parameter names (`{ a, b }`)
fn shorthand(params: &[FunctionParam]) -> String {
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("{{ {} }}", names.join(", "))
}

/// Assembles function data for the endpoints of a model.
///
/// Holds the mutable reference table and resolver so synthetic query
/// records can be registered as they are first needed.
pub struct FunctionAssembler<'a> {
    config: &'a GeneratorConfig,
    references: &'a mut ReferenceTable,
    resolver: &'a mut TypeResolver,
}

impl<'a> FunctionAssembler<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        references: &'a mut ReferenceTable,
        resolver: &'a mut TypeResolver,
    ) -> Self {
        Self {
            config,
            references,
            resolver,
        }
    }

    /// Build the data for one function file, ordered by the function order rules
    pub fn assemble_file(&mut self, group: &EndpointGroup) -> Result<FunctionFileData> {
        let mut functions = Vec::with_capacity(group.endpoints.len());
        for endpoint in &group.endpoints {
            functions.push(self.assemble(group, endpoint)?);
        }

        let typed = self.config.gen_mode == GenMode::Ts;
        let imports = if typed {
            collect_imports(&functions, &*self.resolver)
        } else {
            Vec::new()
        };

        if typed && self.config.type_scope == TypeScope::Namespace {
            let namespace = self.config.namespace_id.as_str();
            for function in &mut functions {
                function.return_type = qualify_type_names(&function.return_type, namespace);
                let params = function
                    .params
                    .iter_mut()
                    .chain(function.path_variables.iter_mut())
                    .chain(function.query_params.iter_mut())
                    .chain(function.body_data.iter_mut());
                for param in params.filter(|p| p.is_ref_type) {
                    param.param_type = qualify_type_names(&param.param_type, namespace);
                }
            }
        }

        let functions = order_by_rules(functions, &self.config.function_order_rules, |f| {
            f.name.as_str()
        });

        let extension = if typed { "ts" } else { "js" };
        Ok(FunctionFileData {
            file_name: format!("{}.{}", group.name, extension),
            group: group.name.clone(),
            tag: group.tag.clone(),
            description: group.description.clone(),
            file_heads: self.config.file_heads.clone(),
            imports,
            functions,
            scope: ScopeFlags::from(self.config.type_scope),
            namespace_id: self.config.namespace_id.clone(),
            typed,
            aggregated: self.config.param_mode == ParamMode::Aggregated,
        })
    }

    /// Build the function for one endpoint
    pub fn assemble(&mut self, group: &EndpointGroup, endpoint: &Endpoint) -> Result<FunctionData> {
        let raw_name = path_segment(&endpoint.path, 1).ok_or_else(|| {
            Error::structural(
                format!("{} {}", endpoint.method, endpoint.path),
                "path has no operation segment",
            )
        })?;
        let name = apply_fix_rules(
            &self.config.function_name_rules,
            raw_name,
            "group",
            &group.name,
        );

        let return_type = match &endpoint.response.reference {
            Some(reference) => self.resolver.type_name(reference),
            None => endpoint.response.field_type.clone(),
        };

        let is_get = endpoint.method == HttpMethod::Get;
        let aggregated = self.config.param_mode == ParamMode::Aggregated;

        let path_variables: Vec<FunctionParam> = endpoint
            .request
            .path_variables
            .iter()
            .map(FunctionParam::from)
            .collect();

        let body_name = if aggregated { "data" } else { "object" };
        let body_param = endpoint
            .request
            .body_content()
            .map(|content| self.body_param(body_name, content));

        let has_query = !endpoint.request.query_params.is_empty();
        // A body object and a query record cannot share one aggregated request
        if aggregated && has_query && body_param.is_some() {
            return Err(Error::conflict(&endpoint.path));
        }

        let query_derived: Vec<FunctionParam> = if !has_query {
            Vec::new()
        } else if aggregated {
            let param_name = if is_get { "params" } else { "data" };
            vec![self.query_record_param(param_name, endpoint)]
        } else {
            endpoint
                .request
                .query_params
                .iter()
                .map(FunctionParam::from)
                .collect()
        };

        let (query_params, extra_body) = if is_get {
            (query_derived, Vec::new())
        } else {
            (Vec::new(), query_derived)
        };

        if body_param.is_some() && !extra_body.is_empty() {
            return Err(Error::conflict(&endpoint.path));
        }

        let body_data: Vec<FunctionParam> = body_param.iter().cloned().chain(extra_body).collect();

        let params_payload = match query_params.as_slice() {
            [] => None,
            [single] if single.is_ref_type => Some(single.name.clone()),
            expanded => Some(shorthand(expanded)),
        };
        let data_payload = match (&body_param, body_data.as_slice()) {
            (_, []) => None,
            (Some(body), _) => Some(body.name.clone()),
            (None, [single]) if aggregated => Some(single.name.clone()),
            (None, expanded) => Some(shorthand(expanded)),
        };

        let content_type = match (&data_payload, endpoint.request.content_type()) {
            (Some(_), Some(ct)) if self.config.shows_content_type(ct) => Some(ct.to_string()),
            _ => None,
        };

        let params = path_variables
            .iter()
            .chain(query_params.iter())
            .chain(body_data.iter())
            .cloned()
            .collect();

        log::debug!(
            "Assembled {} {} as '{}' returning '{}'",
            endpoint.method,
            endpoint.path,
            name,
            return_type
        );

        Ok(FunctionData {
            name,
            description: endpoint.description.clone(),
            params,
            return_type,
            url: template_url(&endpoint.path),
            method: endpoint.method,
            path_variables,
            query_params,
            body_data,
            content_type,
            params_payload,
            data_payload,
        })
    }

    fn body_param(&self, name: &str, content: &Field) -> FunctionParam {
        match &content.reference {
            Some(reference) => FunctionParam::reference(name, self.resolver.type_name(reference)),
            None => FunctionParam {
                name: name.to_string(),
                param_type: content.field_type.clone(),
                required: true,
                description: None,
                is_ref_type: false,
            },
        }
    }

    /// Parameter typed by the endpoint's synthetic query record, creating the
    /// record on first use
    fn query_record_param(&mut self, name: &str, endpoint: &Endpoint) -> FunctionParam {
        let record = query_record_name(&endpoint.path);
        let handle = self
            .references
            .get_or_create(&record, || endpoint.request.query_params.clone());
        if handle.created {
            log::debug!("Created query record '{}' for {}", handle.name, endpoint.path);
            self.resolver.register(&handle.name);
        }
        FunctionParam::reference(name, self.resolver.type_name(&handle.name))
    }
}
