//! 数学ユーティリティモジュール
//!
//! このモジュールには、物理演算で使用される2次元ベクトルと幾何関数が含まれています。
//! 座標系はy軸上向きです。

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// ゼロ長とみなす長さの閾値
pub const EPSILON: f64 = 1e-9;

/// 2次元ベクトル
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// ゼロベクトル
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// ベクトルの長さ
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// ベクトルの長さの二乗（比較用）
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// 内積
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 外積（z成分）
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// 正規化したベクトルを返す
    ///
    /// 長さがゼロの場合は`None`
    pub fn normalized(self) -> Option<Vec2> {
        let length = self.length();
        if length > EPSILON {
            Some(Vec2::new(self.x / length, self.y / length))
        } else {
            None
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from(value: (f64, f64)) -> Self {
        Vec2::new(value.0, value.1)
    }
}

/// 2点間の距離を計算
///
/// # 引数
///
/// * `p1` - 1つ目の点
/// * `p2` - 2つ目の点
///
/// # 戻り値
///
/// * 2点間のユークリッド距離
pub fn distance(p1: Vec2, p2: Vec2) -> f64 {
    (p2 - p1).length()
}

/// 2点の中点
pub fn midpoint(p1: Vec2, p2: Vec2) -> Vec2 {
    Vec2::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// 辺 `start → end` の右手側の単位法線
///
/// 反時計回りの多角形では外向きになります。辺の長さがゼロなら`None`を返します。
///
/// # 引数
///
/// * `start` - 辺の始点
/// * `end` - 辺の終点
pub fn edge_normal(start: Vec2, end: Vec2) -> Option<Vec2> {
    let edge = end - start;
    // 90度時計回りに回転
    Vec2::new(edge.y, -edge.x).normalized()
}

/// 多角形の符号付き面積（反時計回りで正）
pub fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += vertices[i].cross(vertices[j]);
    }
    twice_area / 2.0
}
