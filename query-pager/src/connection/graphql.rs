//! GraphQL connection objects
//!
//! Use the `define_connection!` macro to create type-specific connections.

/// Define a GraphQL connection type for a specific node type
///
/// Generates `$edge_name { node, cursor }` and
/// `$conn_name { pageInfo, edges, totalCount }`, where `totalCount` runs the
/// count query only when selected. Both derive `async_graphql::SimpleObject`,
/// so the calling crate needs `async-graphql` as a dependency.
///
/// Usage:
/// ```ignore
/// define_connection!(TodoItemConnection, TodoItemEdge, TodoItem);
///
/// async fn todo_items(&self, query: Query<CursorPaging>) -> async_graphql::Result<TodoItemConnection> {
///     let connection =
///         CursorConnection::create_from_service(&self.pager, self.store.clone(), &query)
///             .await
///             .map_err(|e| e.extend())?;
///     Ok(connection.into())
/// }
/// ```
#[macro_export]
macro_rules! define_connection {
    ($conn_name:ident, $edge_name:ident, $node_type:ty) => {
        /// Edge containing a node and cursor
        #[derive(async_graphql::SimpleObject, Debug, Clone)]
        pub struct $edge_name {
            /// The item at the end of the edge
            pub node: $node_type,
            /// A cursor for pagination
            pub cursor: String,
        }

        /// Connection containing edges, page info and a lazy total count
        #[derive(async_graphql::SimpleObject, Debug, Clone)]
        #[graphql(complex)]
        pub struct $conn_name {
            /// Pagination information
            pub page_info: $crate::connection::PageInfo,
            /// The edges in this connection
            pub edges: Vec<$edge_name>,
            /// Count behind the `totalCount` field
            #[graphql(skip)]
            pub total_count: $crate::connection::TotalCount,
        }

        #[async_graphql::ComplexObject]
        impl $conn_name {
            /// Total number of items matching the filter
            #[graphql(name = "totalCount")]
            async fn resolve_total_count(&self) -> async_graphql::Result<u64> {
                use async_graphql::ErrorExtensions as _;
                self.total_count.get().await.map_err(|e| e.extend())
            }
        }

        impl From<$crate::connection::CursorConnection<$node_type>> for $conn_name {
            fn from(conn: $crate::connection::CursorConnection<$node_type>) -> Self {
                Self {
                    page_info: conn.page_info,
                    edges: conn
                        .edges
                        .into_iter()
                        .map(|e| $edge_name {
                            node: e.node,
                            cursor: e.cursor,
                        })
                        .collect(),
                    total_count: conn.total_count,
                }
            }
        }
    };
}
