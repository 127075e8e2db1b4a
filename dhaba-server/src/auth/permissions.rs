//! 角色与权限定义
//!
//! 三个固定角色，每个角色绑定一组静态权限。权限集不落库，
//! 代码即配置；用户文档只存角色名。

use serde::{Deserialize, Serialize};

/// 权限常量
///
/// 格式: `资源:操作`
pub mod perm {
    pub const PRODUCTS_READ: &str = "products:read";
    pub const PRODUCTS_WRITE: &str = "products:write";
    pub const TABLES_READ: &str = "tables:read";
    pub const TABLES_WRITE: &str = "tables:write";
    pub const ORDERS_READ: &str = "orders:read";
    pub const ORDERS_WRITE: &str = "orders:write";
    pub const USERS_READ: &str = "users:read";
    pub const USERS_WRITE: &str = "users:write";
    pub const SETTINGS_READ: &str = "settings:read";
    pub const SETTINGS_WRITE: &str = "settings:write";
    pub const PRINT: &str = "print:execute";
}

/// 全部已知权限 (文档用途)
pub const ALL_PERMISSIONS: &[&str] = &[
    perm::PRODUCTS_READ,
    perm::PRODUCTS_WRITE,
    perm::TABLES_READ,
    perm::TABLES_WRITE,
    perm::ORDERS_READ,
    perm::ORDERS_WRITE,
    perm::USERS_READ,
    perm::USERS_WRITE,
    perm::SETTINGS_READ,
    perm::SETTINGS_WRITE,
    perm::PRINT,
];

/// 员工角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 店主: 全部权限
    Owner,
    /// 管理员: 除员工管理外的全部权限
    Admin,
    /// 普通员工: 点单、开台、打印
    Staff,
}

impl Role {
    /// 角色的静态权限集
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Role::Owner => ALL_PERMISSIONS,
            Role::Admin => &[
                perm::PRODUCTS_READ,
                perm::PRODUCTS_WRITE,
                perm::TABLES_READ,
                perm::TABLES_WRITE,
                perm::ORDERS_READ,
                perm::ORDERS_WRITE,
                perm::SETTINGS_READ,
                perm::SETTINGS_WRITE,
                perm::PRINT,
            ],
            Role::Staff => &[
                perm::PRODUCTS_READ,
                perm::TABLES_READ,
                perm::TABLES_WRITE,
                perm::ORDERS_READ,
                perm::ORDERS_WRITE,
                perm::PRINT,
            ],
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    /// 解析角色名，未知角色返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_everything() {
        for p in ALL_PERMISSIONS {
            assert!(Role::Owner.has_permission(p), "owner missing {}", p);
        }
    }

    #[test]
    fn test_admin_cannot_manage_users() {
        assert!(!Role::Admin.has_permission(perm::USERS_WRITE));
        assert!(!Role::Admin.has_permission(perm::USERS_READ));
        assert!(Role::Admin.has_permission(perm::SETTINGS_WRITE));
    }

    #[test]
    fn test_staff_is_front_of_house_only() {
        assert!(Role::Staff.has_permission(perm::ORDERS_WRITE));
        assert!(Role::Staff.has_permission(perm::PRINT));
        assert!(!Role::Staff.has_permission(perm::PRODUCTS_WRITE));
        assert!(!Role::Staff.has_permission(perm::SETTINGS_WRITE));
    }

    #[test]
    fn test_parse_round_trip() {
        for role in [Role::Owner, Role::Admin, Role::Staff] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("manager"), None);
    }
}
