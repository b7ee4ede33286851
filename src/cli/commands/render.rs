use clap::{Args, ValueEnum};
use serde_json::json;

use crate::cli::utils::{format_sql, output_error, output_success};
use crate::cli::OutputFormat;
use crate::database::pagination::pagination_sql;
use crate::filter::{FilterMap, ListFilters, SqlResult, TodoFilters, UserFilters};
use crate::query::{
    BaseQuery, DecoratorRegistry, ListQueryFactory, OwnerJoin, QueryNode, TodoQueryFactory, UserQueryFactory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Todos,
    Lists,
    Users,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(value_enum, help = "Entity to query")]
    pub entity: Entity,

    #[arg(short, long = "filter", value_parser = parse_filter, help = "Filter as key=value, repeatable")]
    pub filters: Vec<(String, String)>,

    #[arg(long, help = "Scope todos (or collaborators, for users) to one list id")]
    pub list: Option<String>,

    #[arg(long, help = "Override how owner_id joins other list predicates (and|or)")]
    pub owner_join: Option<OwnerJoin>,

    #[arg(long, help = "Show the statement with parameters inlined")]
    pub inline: bool,

    #[arg(long, help = "Also show the pagination aggregate")]
    pub pagination: bool,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// The statements a request with these filters would run.
#[derive(Debug)]
pub struct Rendered {
    pub page: SqlResult,
    pub pagination: Option<SqlResult>,
}

pub fn render(args: &RenderArgs, registry: &DecoratorRegistry) -> anyhow::Result<Rendered> {
    let filters: FilterMap = args.filters.iter().cloned().collect();

    let (node, source): (QueryNode, &str) = match args.entity {
        Entity::Todos => {
            let base = match &args.list {
                Some(list_id) => TodoQueryFactory::list_base(list_id),
                None => BaseQuery::new(TodoQueryFactory::BASE_SQL),
            };
            let filters = TodoFilters::from_filter_map(&filters);
            (
                TodoQueryFactory::new(registry).build_query(base, Some(&filters))?,
                TodoQueryFactory::SOURCE_TABLE,
            )
        }
        Entity::Lists => {
            if args.list.is_some() {
                anyhow::bail!("--list applies to todos and users only");
            }
            let join = args.owner_join.unwrap_or(crate::config::config().query.owner_join);
            let filters = ListFilters::from_filter_map(&filters);
            (
                ListQueryFactory::new(registry, join).build_query(BaseQuery::new(ListQueryFactory::BASE_SQL), Some(&filters))?,
                ListQueryFactory::SOURCE_TABLE,
            )
        }
        Entity::Users => {
            let base = match &args.list {
                Some(list_id) => UserQueryFactory::collaborators_base(list_id),
                None => BaseQuery::new(UserQueryFactory::BASE_SQL),
            };
            let filters = UserFilters::from_filter_map(&filters);
            (
                UserQueryFactory::new(registry).build_query(base, Some(&filters))?,
                UserQueryFactory::SOURCE_TABLE,
            )
        }
    };

    let pagination = if args.pagination {
        let predicate = node.render_predicate();
        Some(SqlResult {
            query: pagination_sql(source, &predicate.query)?,
            params: predicate.params,
        })
    } else {
        None
    };

    Ok(Rendered { page: node.render(), pagination })
}

pub async fn handle(args: RenderArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match render(&args, DecoratorRegistry::global()) {
        Ok(rendered) => rendered,
        Err(e) => {
            output_error(&output_format, &e.to_string(), Some("RENDER_FAILED"))?;
            std::process::exit(2);
        }
    };

    match output_format {
        OutputFormat::Json => {
            let data = json!({
                "query": rendered.page.query,
                "params": rendered.page.params,
                "inline": args.inline.then(|| rendered.page.inline()),
                "pagination": rendered.pagination,
            });
            output_success(&output_format, "rendered", Some(data))
        }
        OutputFormat::Text => {
            if args.inline {
                println!("{}", rendered.page.inline());
            } else {
                println!("{}", format_sql(&rendered.page));
            }
            if let Some(pagination) = &rendered.pagination {
                println!();
                if args.inline {
                    println!("{}", pagination.inline());
                } else {
                    println!("{}", format_sql(pagination));
                }
            }
            Ok(())
        }
    }
}
