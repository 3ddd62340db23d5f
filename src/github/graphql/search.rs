use std::sync::LazyLock;

use crate::types::SearchQuery;

use super::compat::gate_template;
use super::graphql_types::GraphQLQuery;
use super::query::{QueryBuildError, QueryTemplate};

const SEARCH_LIMIT: u8 = 100;
const ASSIGNEE_LIMIT: u8 = 10;
const LABEL_LIMIT: u8 = 10;

/// Fields requested for both issues and pull requests.
static SEARCH_ITEM_FIELDS: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"__typename
            assignees(first: {}) {{
              edges {{
                node {{
                  avatarUrl
                  login
                  name
                }}
              }}
            }}
            author {{
              avatarUrl
              login
              ... on User {{
                name
              }}
            }}
            body
            closedAt
            comments {{
              totalCount
            }}
            createdAt
            databaseId
            labels(first: {}) {{
              edges {{
                node {{
                  color
                  id
                  name
                  url
                }}
              }}
            }}
            milestone {{
              id
              title
              dueOn
              url
            }}
            number
            repository {{
              owner {{
                login
              }}
              name
              isPrivate
            }}
            title
            updatedAt
            url"#,
        ASSIGNEE_LIMIT, LABEL_LIMIT
    )
});

static SEARCH_TEMPLATE: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"search(query: __SEARCH_QUERY__, type: ISSUE, last: {}) {{
      edges {{
        node {{
          ... on Issue {{
            __ITEM_FIELDS__
            issueState: state
          }}
          ... on PullRequest {{
            __ITEM_FIELDS__
            prState: state
            mergedAt
            isDraft
          }}
        }}
      }}
    }}"#,
        SEARCH_LIMIT
    )
});

/// Builds the issue/pull request search selection set for `query`.
pub fn search_query(
    query: &SearchQuery,
    ghe_version_context: &str,
) -> Result<GraphQLQuery, QueryBuildError> {
    let source = gate_template(&SEARCH_TEMPLATE, ghe_version_context).into_owned();
    QueryTemplate::from_string("search", source)
        .bind()
        .string("SEARCH_QUERY", query.as_str())
        .fragment(
            "ITEM_FIELDS",
            gate_template(&SEARCH_ITEM_FIELDS, ghe_version_context),
        )
        .build()
}
